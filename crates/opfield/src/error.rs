//! Error types for item loading

use opfield_connect::ConnectError;
use std::num::ParseIntError;
use thiserror::Error;

/// Result alias used throughout opfield
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error types for fetching items and populating destinations
#[derive(Debug, Error)]
pub enum Error {
    /// The destination or the process configuration is unusable
    #[error("invalid configuration: {message}")]
    Configuration {
        /// What is wrong
        message: String,
    },

    /// No client could be built from the environment
    #[error("failed to get 1password tokens from environment")]
    Credentials(#[source] ConnectError),

    /// The HTTP client could not be built
    #[error("failed to build 1password client")]
    Client(#[source] ConnectError),

    /// A vault title matched nothing
    #[error("no vault with title {title} found")]
    VaultNotFound {
        /// Title that was queried
        title: String,
    },

    /// The Connect client failed during `stage`
    #[error("{stage}")]
    Transport {
        /// Which step was running
        stage: &'static str,
        /// Error reported by the client
        #[source]
        source: ConnectError,
    },

    /// A tagged field has a type population cannot write
    #[error("unsupported type {type_name:?} for field {field}")]
    UnsupportedType {
        /// Field name on the destination
        field: &'static str,
        /// Declared type of the field
        type_name: &'static str,
    },

    /// An integer field received a value that does not parse
    #[error("error converting {value:?} to int for field {field}")]
    InvalidInteger {
        /// Field name on the destination
        field: &'static str,
        /// Raw item value
        value: String,
        /// Parse failure
        #[source]
        source: ParseIntError,
    },

    /// A tagged field cannot be written
    #[error("cannot load item value into read-only field {field}")]
    ReadOnlyField {
        /// Field name on the destination
        field: &'static str,
    },

    /// An inner error with the step it happened in
    #[error("{stage}")]
    Stage {
        /// Which step was running
        stage: &'static str,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`], looking through [`Error::Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid destination or process configuration
    Configuration,
    /// Environment credential lookup failed
    Credential,
    /// Vault title matched nothing
    Lookup,
    /// Client request failed
    Transport,
    /// Unsupported field type or unparsable integer
    Type,
    /// Field cannot be written
    Access,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } | Self::Client(_) => ErrorKind::Configuration,
            Self::Credentials(_) => ErrorKind::Credential,
            Self::VaultNotFound { .. } => ErrorKind::Lookup,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::UnsupportedType { .. } | Self::InvalidInteger { .. } => ErrorKind::Type,
            Self::ReadOnlyField { .. } => ErrorKind::Access,
            Self::Stage { source, .. } => source.kind(),
        }
    }

    /// Wrap `self` with the step it happened in.
    #[must_use]
    pub fn in_stage(self, stage: &'static str) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    pub(crate) fn transport(stage: &'static str) -> impl FnOnce(ConnectError) -> Self {
        move |source| Self::Transport { stage, source }
    }
}
