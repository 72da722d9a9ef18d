//! 1Password Connect client for opfield
//!
//! Provides the small slice of the 1Password Connect REST API that opfield
//! needs: vault lookup by title and item lookup by title. The transport is a
//! blocking `reqwest` client; callers that want a different transport (or a
//! fake in tests) implement [`ConnectClient`] themselves.
//!
//! ```ignore
//! use opfield_connect::{ConnectClient, HttpConnectClient};
//!
//! let client = HttpConnectClient::from_environment()?;
//! let vaults = client.get_vaults_by_title("Engineering")?;
//! let item = client.get_item_by_title("db-creds", &vaults[0].id)?;
//! let host = item.get_value("host");
//! ```

mod http;
mod model;

pub use http::{CONNECT_HOST_ENV, CONNECT_TOKEN_ENV, DEFAULT_TIMEOUT, HttpConnectClient};
pub use model::{Field, FieldSection, Item, ItemValues, Vault, VaultRef};

use thiserror::Error;

/// Error types for 1Password Connect requests
#[derive(Debug, Error)]
pub enum ConnectError {
    /// `OP_CONNECT_HOST` is unset or empty
    #[error("there is no hostname available in the OP_CONNECT_HOST variable")]
    MissingHost,

    /// `OP_CONNECT_TOKEN` is unset or empty
    #[error("there is no token available in the OP_CONNECT_TOKEN variable")]
    MissingToken,

    /// The configured host is not an absolute http(s) URL
    #[error("invalid 1Password Connect host '{host}'")]
    InvalidHost {
        /// Host as configured
        host: String,
    },

    /// The underlying HTTP client could not be built
    #[error("failed to build HTTP client for 1Password Connect")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response
    #[error("network error communicating with 1Password Connect")]
    Network(#[source] reqwest::Error),

    /// 401/403 from the server
    #[error("1Password Connect authentication failed ({status}): {message}")]
    Unauthorized {
        /// HTTP status code
        status: u16,
        /// Message reported by the server
        message: String,
    },

    /// 404 from the server
    #[error("1Password Connect resource not found: {message}")]
    NotFound {
        /// Message reported by the server
        message: String,
    },

    /// Any other non-success status
    #[error("1Password Connect returned status {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message reported by the server
        message: String,
    },

    /// The response body could not be decoded
    #[error("failed to decode 1Password Connect response")]
    Decode(#[source] reqwest::Error),

    /// No item in the vault carries the requested title
    #[error("found 0 items in vault '{vault_id}' with title '{title}'")]
    ItemNotFound {
        /// Requested item title
        title: String,
        /// Vault that was searched
        vault_id: String,
    },

    /// More than one item in the vault carries the requested title
    #[error("found {count} items in vault '{vault_id}' with title '{title}'")]
    AmbiguousItem {
        /// Requested item title
        title: String,
        /// Vault that was searched
        vault_id: String,
        /// Number of matching items
        count: usize,
    },
}

/// The capabilities opfield needs from a 1Password Connect server.
///
/// [`HttpConnectClient`] is the production implementation. Calls are
/// synchronous; timeouts and cancellation belong to the implementation.
pub trait ConnectClient: Send + Sync {
    /// List vaults whose title matches `title`, in server order.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectError`] if the request fails.
    fn get_vaults_by_title(&self, title: &str) -> Result<Vec<Vault>, ConnectError>;

    /// Fetch the single item titled `title` from vault `vault_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::ItemNotFound`] or [`ConnectError::AmbiguousItem`]
    /// when the title does not match exactly one item, or a transport error.
    fn get_item_by_title(&self, title: &str, vault_id: &str) -> Result<Item, ConnectError>;
}

impl<C: ConnectClient + ?Sized> ConnectClient for Box<C> {
    fn get_vaults_by_title(&self, title: &str) -> Result<Vec<Vault>, ConnectError> {
        (**self).get_vaults_by_title(title)
    }

    fn get_item_by_title(&self, title: &str, vault_id: &str) -> Result<Item, ConnectError> {
        (**self).get_item_by_title(title, vault_id)
    }
}
