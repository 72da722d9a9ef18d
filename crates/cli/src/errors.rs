//! CLI error reporting through miette diagnostics

use miette::Diagnostic;
use opfield::ErrorKind;
use thiserror::Error;

/// CLI-specific error types with diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Failed to load item '{title}'")]
    #[diagnostic(code(opfield::cli::item_failed))]
    ItemFailed {
        title: String,
        #[source]
        source: opfield::Error,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to resolve vault '{title}'")]
    #[diagnostic(code(opfield::cli::vault_failed))]
    VaultFailed {
        title: String,
        #[source]
        source: opfield::Error,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to encode output as JSON")]
    #[diagnostic(code(opfield::cli::json_error))]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output")]
    #[diagnostic(
        code(opfield::cli::output_error),
        help("Check that stdout is still open (e.g. the pipe reader has not exited)")
    )]
    Output {
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn item_failed(title: impl Into<String>, source: opfield::Error) -> Self {
        let help = help_for(&source);
        Self::ItemFailed {
            title: title.into(),
            source,
            help,
        }
    }

    pub fn vault_failed(title: impl Into<String>, source: opfield::Error) -> Self {
        let help = help_for(&source);
        Self::VaultFailed {
            title: title.into(),
            source,
            help,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(source: std::io::Error) -> Self {
        Self::Output { source }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

fn help_for(error: &opfield::Error) -> Option<String> {
    let help = match error.kind() {
        ErrorKind::Credential => {
            "Set OP_CONNECT_HOST and OP_CONNECT_TOKEN, or pass both --url and --token"
        }
        ErrorKind::Lookup => "Check the vault title, or pass --vault with the vault id",
        ErrorKind::Transport => {
            "Check that the Connect server is reachable and the token can read the vault"
        }
        ErrorKind::Configuration | ErrorKind::Type | ErrorKind::Access => return None,
    };
    Some(help.to_string())
}
