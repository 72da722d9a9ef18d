//! opfield command-line interface

mod cli;
mod commands;
mod errors;
mod logging;

use clap::Parser;
use cli::Cli;
use logging::TracingConfig;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        filter: cli.log_filter,
    })?;

    let stdout = std::io::stdout();
    commands::run(cli.command, &mut stdout.lock())?;
    Ok(())
}
