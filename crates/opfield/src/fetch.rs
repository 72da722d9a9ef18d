//! Item fetch and fetch-and-populate

use crate::client::{resolve_client, resolve_vault_by_title};
use crate::populate::{Populate, populate};
use crate::{Error, Result, Settings};
use opfield_connect::{ConnectClient, Item};

const CLIENT_STAGE: &str = "failed to get 1password client";
const ITEM_STAGE: &str = "error getting item from vault";
const POPULATE_STAGE: &str = "failed to populate destination";

/// Fetch the item titled `title` from vault `vault_id`.
///
/// # Errors
///
/// Returns [`Error::Transport`] wrapping whatever the client reports.
pub fn fetch_item<C>(client: &C, title: &str, vault_id: &str) -> Result<Item>
where
    C: ConnectClient + ?Sized,
{
    let item = client
        .get_item_by_title(title, vault_id)
        .map_err(Error::transport(ITEM_STAGE))?;
    tracing::debug!(title, vault_id, fields = item.fields.len(), "Fetched item");
    Ok(item)
}

/// Fetch `title` through an existing client, resolving the vault from `settings`.
///
/// # Errors
///
/// Vault resolution and item fetch errors, unwrapped.
pub fn get_item_with<C>(client: &C, title: &str, settings: &Settings) -> Result<Item>
where
    C: ConnectClient + ?Sized,
{
    let vault_id = match settings.title() {
        Some(vault_title) => resolve_vault_by_title(client, vault_title)?,
        None => settings.vault().to_string(),
    };
    fetch_item(client, title, &vault_id)
}

/// Fetch the item titled `title`.
///
/// ```ignore
/// let item = opfield::get_item("db-creds", Settings::default().with_vault_title("Engineering"))?;
/// let host = item.get_value("host");
/// ```
///
/// # Errors
///
/// Client errors are wrapped in [`Error::Stage`]; vault resolution and item
/// fetch errors are returned as-is.
///
/// # Blocking
///
/// Waits on the network. Inside a tokio runtime the requests run on a scoped
/// thread, so the call succeeds but holds the calling worker until it
/// returns; async callers should go through `tokio::task::spawn_blocking`.
pub fn get_item(title: &str, settings: Settings) -> Result<Item> {
    let client = resolve_client(&settings).map_err(|e| e.in_stage(CLIENT_STAGE))?;
    get_item_with(&*client, title, &settings)
}

/// Fetch `title` through an existing client and populate `dest` from it.
///
/// # Errors
///
/// Vault resolution and item fetch errors as-is; population errors wrapped
/// in [`Error::Stage`].
pub fn load_item_with<C, T>(client: &C, title: &str, dest: &mut T, settings: &Settings) -> Result<()>
where
    C: ConnectClient + ?Sized,
    T: Populate + ?Sized,
{
    let item = get_item_with(client, title, settings)?;
    populate(&item, dest, &settings.key_convention).map_err(|e| e.in_stage(POPULATE_STAGE))
}

/// Fetch the item titled `title` and copy its values into `dest`.
///
/// ```ignore
/// #[derive(Default, opfield::Populate)]
/// struct Database {
///     #[opfield("host")]
///     host: String,
///     #[opfield("port")]
///     port: u16,
/// }
///
/// let mut db = Database::default();
/// opfield::load_item("db-creds", &mut db, Settings::default().with_vault_title("Engineering"))?;
/// ```
///
/// # Errors
///
/// The first failing step's error: client or population (both in
/// [`Error::Stage`]), vault resolution or item fetch.
///
/// # Blocking
///
/// Waits on the network. Inside a tokio runtime the requests run on a scoped
/// thread, so the call succeeds but holds the calling worker until it
/// returns; async callers should go through `tokio::task::spawn_blocking`.
pub fn load_item<T>(title: &str, dest: &mut T, settings: Settings) -> Result<()>
where
    T: Populate + ?Sized,
{
    let client = resolve_client(&settings).map_err(|e| e.in_stage(CLIENT_STAGE))?;
    load_item_with(&*client, title, dest, &settings)
}
