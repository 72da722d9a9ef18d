//! Load 1Password Connect items into Rust structs
//!
//! opfield fetches an item by title from a 1Password Connect server and
//! copies its field values into a struct whose fields are tagged with the
//! item key they come from.
//!
//! ```ignore
//! use opfield::{Populate, Settings};
//!
//! #[derive(Debug, Default, Populate)]
//! struct Database {
//!     #[opfield("host")]
//!     host: String,
//!     #[opfield("port")]
//!     port: u16,
//!     // Untagged fields are never touched
//!     pool_size: usize,
//! }
//!
//! let mut db = Database::default();
//! opfield::load_item(
//!     "db-creds",
//!     &mut db,
//!     Settings::default().with_vault_title("Engineering"),
//! )?;
//! ```
//!
//! # Credentials
//!
//! When [`Settings`] carries both a URL and a token they are used as given.
//! Otherwise the client is configured from `OP_CONNECT_HOST` and
//! `OP_CONNECT_TOKEN`.
//!
//! # Key convention
//!
//! By default a tag is the item key. [`KeyConvention::Suffix`] appends a fixed
//! suffix first, e.g. [`KeyConvention::entry`] reads `hostEntry` for tag
//! `host`.

// Lets `#[derive(Populate)]` output (which names `::opfield`) compile inside this crate's tests.
extern crate self as opfield;

mod client;
mod error;
mod fetch;
mod populate;
mod settings;

pub use client::{resolve_client, resolve_vault_by_title};
pub use error::{Error, ErrorKind, Result};
pub use fetch::{fetch_item, get_item, get_item_with, load_item, load_item_with};
pub use populate::{FieldBinding, Populate, populate};
pub use settings::{DEFAULT_VAULT_ID, KeyConvention, Settings, default_vault, set_default_vault};

pub use opfield_connect::{ConnectClient, ConnectError, HttpConnectClient, Item, ItemValues, Vault};
pub use opfield_derive::Populate;
