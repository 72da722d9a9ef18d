use crate::logging::{LogLevel, TracingFormat};
use clap::{Args, Parser, Subcommand};
use opfield::{KeyConvention, Settings};

#[derive(Parser, Debug)]
#[command(name = "opfield")]
#[command(about = "Read items from a 1Password Connect server")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(
        long,
        global = true,
        help = "Tracing filter directive, e.g. 'opfield_connect=trace' (overrides RUST_LOG and --level)"
    )]
    pub log_filter: Option<String>,
}

/// Connect server and vault selection shared by all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    #[arg(long, help = "Connect server URL (default: $OP_CONNECT_HOST)")]
    pub url: Option<String>,

    #[arg(long, help = "Connect access token (default: $OP_CONNECT_TOKEN)")]
    pub token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Fetch an item and print its fields")]
    Item {
        #[arg(help = "Item title")]
        title: String,

        #[arg(long, env = "OP_VAULT", help = "Vault id")]
        vault: Option<String>,

        #[arg(
            long,
            env = "OP_VAULT_TITLE",
            help = "Vault title (takes precedence over --vault)"
        )]
        vault_title: Option<String>,

        #[arg(
            long = "field",
            short = 'f',
            help = "Field to print; repeat for several. Without it, field labels are listed"
        )]
        fields: Vec<String>,

        #[arg(long, help = "Append this suffix to each --field before lookup")]
        key_suffix: Option<String>,

        #[arg(long, help = "Print a JSON object instead of key=value lines")]
        json: bool,

        #[command(flatten)]
        connection: ConnectionArgs,
    },
    #[command(about = "Resolve a vault title to its id")]
    Vault {
        #[arg(help = "Vault title")]
        title: String,

        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

impl ConnectionArgs {
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(url) = &self.url {
            settings = settings.with_url(url.clone());
        }
        if let Some(token) = &self.token {
            settings = settings.with_token(token.clone());
        }
        settings
    }
}

pub fn key_convention(suffix: Option<&str>) -> KeyConvention {
    match suffix {
        Some(suffix) if !suffix.is_empty() => KeyConvention::Suffix(suffix.to_string()),
        _ => KeyConvention::Verbatim,
    }
}
