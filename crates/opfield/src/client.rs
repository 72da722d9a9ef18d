//! Client and vault resolution

use crate::{Error, Result, Settings};
use opfield_connect::{ConnectClient, ConnectError, HttpConnectClient};
use secrecy::ExposeSecret;

/// Build a Connect client for `settings`.
///
/// With both URL and token set, the client is built from them directly and
/// nothing is validated until the first request. Otherwise credentials come
/// from `OP_CONNECT_HOST` and `OP_CONNECT_TOKEN`.
///
/// # Errors
///
/// Returns [`Error::Credentials`] if the environment lookup fails and
/// [`Error::Client`] if the HTTP client cannot be built.
pub fn resolve_client(settings: &Settings) -> Result<Box<dyn ConnectClient>> {
    let url = settings.url.as_deref().filter(|u| !u.is_empty());
    let token = settings
        .token
        .as_ref()
        .filter(|t| !t.expose_secret().is_empty());

    match (url, token) {
        (Some(url), Some(token)) => {
            tracing::debug!(url = %url, "Using explicit 1Password Connect credentials");
            let client = HttpConnectClient::new(url, token.clone()).map_err(Error::Client)?;
            Ok(Box::new(client))
        }
        _ => {
            tracing::debug!("Using 1Password Connect credentials from environment");
            let client = HttpConnectClient::from_environment().map_err(|e| match e {
                ConnectError::Client(_) => Error::Client(e),
                other => Error::Credentials(other),
            })?;
            Ok(Box::new(client))
        }
    }
}

/// Resolve a vault title to the id of the first matching vault.
///
/// When several vaults share the title, the first one in server order wins.
///
/// # Errors
///
/// Returns [`Error::Transport`] if the query fails and
/// [`Error::VaultNotFound`] if nothing matches.
pub fn resolve_vault_by_title<C>(client: &C, title: &str) -> Result<String>
where
    C: ConnectClient + ?Sized,
{
    let vaults = client
        .get_vaults_by_title(title)
        .map_err(Error::transport("error getting vaults"))?;

    if vaults.len() > 1 {
        tracing::warn!(
            title,
            matches = vaults.len(),
            "Vault title is ambiguous, using the first match"
        );
    }

    let vault = vaults.into_iter().next().ok_or_else(|| Error::VaultNotFound {
        title: title.to_string(),
    })?;
    tracing::debug!(title, vault_id = %vault.id, "Resolved vault title");
    Ok(vault.id)
}
