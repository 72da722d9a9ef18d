//! Per-call settings and the process default vault

use crate::{Error, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::OnceLock;

/// Vault used when neither the call nor the process names one.
pub const DEFAULT_VAULT_ID: &str = "v3swqlej5igrjno7fh3zjynyey";

static DEFAULT_VAULT: OnceLock<String> = OnceLock::new();

/// Set the process-wide default vault.
///
/// Can be called once; later calls fail and leave the first value in place.
/// Until it is called, [`DEFAULT_VAULT_ID`] is the default.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the id is empty or a default was
/// already set.
pub fn set_default_vault(id: impl Into<String>) -> Result<()> {
    let id = id.into();
    if id.is_empty() {
        return Err(Error::Configuration {
            message: "default vault id must not be empty".to_string(),
        });
    }
    DEFAULT_VAULT.set(id).map_err(|rejected| Error::Configuration {
        message: format!(
            "default vault already set to '{}', cannot change it to '{rejected}'",
            default_vault()
        ),
    })
}

/// The process-wide default vault id.
#[must_use]
pub fn default_vault() -> &'static str {
    DEFAULT_VAULT.get().map_or(DEFAULT_VAULT_ID, String::as_str)
}

/// How a field tag becomes the item key that is looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyConvention {
    /// Tag `host` reads item key `host`
    #[default]
    Verbatim,
    /// Tag `host` reads item key `host` followed by the suffix
    Suffix(String),
}

impl KeyConvention {
    /// Suffix used by items whose field labels end in `Entry` (`hostEntry`).
    pub const ENTRY_SUFFIX: &'static str = "Entry";

    /// The `Entry` suffix convention.
    #[must_use]
    pub fn entry() -> Self {
        Self::Suffix(Self::ENTRY_SUFFIX.to_string())
    }

    /// Item key consulted for `tag`.
    #[must_use]
    pub fn key_for<'a>(&self, tag: &'a str) -> Cow<'a, str> {
        match self {
            Self::Verbatim => Cow::Borrowed(tag),
            Self::Suffix(suffix) => Cow::Owned(format!("{tag}{suffix}")),
        }
    }
}

/// Settings for a single fetch.
///
/// Every field is optional. Unset URL or token means credentials come from
/// `OP_CONNECT_HOST`/`OP_CONNECT_TOKEN`; an unset vault means the process
/// default vault; a non-empty vault title is resolved and takes precedence
/// over the vault id.
///
/// ```ignore
/// let settings = Settings::default()
///     .with_vault_title("Engineering")
///     .with_key_convention(KeyConvention::entry());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Vault id
    #[serde(rename = "vault")]
    pub vault_id: Option<String>,
    /// Vault title, resolved to an id through the Connect server
    pub vault_title: Option<String>,
    /// Connect server URL
    pub url: Option<String>,
    /// Connect access token
    pub token: Option<SecretString>,
    /// Tag to item key mapping used by population
    pub key_convention: KeyConvention,
}

impl Settings {
    /// Read items from the vault with this id.
    #[must_use]
    pub fn with_vault(mut self, id: impl Into<String>) -> Self {
        self.vault_id = Some(id.into());
        self
    }

    /// Read items from the vault with this title.
    #[must_use]
    pub fn with_vault_title(mut self, title: impl Into<String>) -> Self {
        self.vault_title = Some(title.into());
        self
    }

    /// Connect server URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Connect access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Tag to item key mapping.
    #[must_use]
    pub fn with_key_convention(mut self, convention: KeyConvention) -> Self {
        self.key_convention = convention;
        self
    }

    /// Vault id to use when no title is resolved.
    #[must_use]
    pub fn vault(&self) -> &str {
        self.vault_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| default_vault())
    }

    /// Vault title, if one is set and non-empty.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.vault_title.as_deref().filter(|t| !t.is_empty())
    }
}
