//! Blocking HTTP implementation of [`ConnectClient`]

use crate::{ConnectClient, ConnectError, Item, Vault};
use reqwest::{StatusCode, Url};
use reqwest::blocking::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Environment variable holding the Connect server URL.
pub const CONNECT_HOST_ENV: &str = "OP_CONNECT_HOST";

/// Environment variable holding the Connect access token.
pub const CONNECT_TOKEN_ENV: &str = "OP_CONNECT_TOKEN";

/// Request timeout applied unless [`HttpConnectClient::with_timeout`] overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body returned by Connect on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// 1Password Connect REST client over `reqwest::blocking`.
///
/// Construction never touches the network; a bad URL or token surfaces on
/// the first request. Safe to use from inside a tokio runtime: building the
/// client and issuing requests move to a scoped thread there, and the calling
/// thread blocks until they finish.
pub struct HttpConnectClient {
    http: Client,
    base_url: String,
    token: SecretString,
}

impl std::fmt::Debug for HttpConnectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnectClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Run `f` on a thread where `reqwest::blocking` is allowed to block.
///
/// The blocking client panics when it waits on a thread that is driving a
/// tokio runtime, so inside one the work runs on a scoped thread instead.
fn outside_runtime<T: Send>(f: impl FnOnce() -> T + Send) -> T {
    if tokio::runtime::Handle::try_current().is_err() {
        return f();
    }
    std::thread::scope(|scope| {
        scope
            .spawn(f)
            .join()
            .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
    })
}

/// `<attribute> eq "<value>"` with `\` and `"` escaped inside the quotes.
fn filter_eq(attribute: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{attribute} eq \"{escaped}\"")
}

impl HttpConnectClient {
    fn user_agent() -> String {
        format!("opfield-connect/{}", env!("CARGO_PKG_VERSION"))
    }

    fn build_http(timeout: Duration) -> Result<Client, ConnectError> {
        let user_agent = Self::user_agent();
        outside_runtime(move || {
            Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()
        })
        .map_err(ConnectError::Client)
    }

    /// Create a client for the server at `url` authenticating with `token`.
    ///
    /// The URL is not validated here; an unusable one fails the first request
    /// with [`ConnectError::InvalidHost`].
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Client`] if the HTTP client cannot be built
    /// (for example when no TLS backend can be initialized).
    pub fn new(url: &str, token: impl Into<SecretString>) -> Result<Self, ConnectError> {
        Ok(Self {
            http: Self::build_http(DEFAULT_TIMEOUT)?,
            base_url: url.trim_end_matches('/').to_owned(),
            token: token.into(),
        })
    }

    /// Create a client from `OP_CONNECT_HOST` and `OP_CONNECT_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::MissingHost`] or [`ConnectError::MissingToken`]
    /// when a variable is unset or empty, [`ConnectError::InvalidHost`]
    /// when the host is not an absolute http(s) URL, and
    /// [`ConnectError::Client`] if the HTTP client cannot be built.
    pub fn from_environment() -> Result<Self, ConnectError> {
        let host = std::env::var(CONNECT_HOST_ENV)
            .ok()
            .filter(|h| !h.trim().is_empty())
            .ok_or(ConnectError::MissingHost)?;
        let token = std::env::var(CONNECT_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConnectError::MissingToken)?;

        match Url::parse(&host) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ConnectError::InvalidHost { host }),
        }

        tracing::debug!(host = %host, "1Password Connect client configured from environment");
        Self::new(&host, token)
    }

    /// Replace the request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Client`] if the HTTP client cannot be rebuilt.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConnectError> {
        self.http = Self::build_http(timeout)?;
        Ok(self)
    }

    /// Base URL requests are issued against, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ConnectError> {
        let invalid = || ConnectError::InvalidHost {
            host: self.base_url.clone(),
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get<T>(&self, url: Url, filter: Option<String>) -> Result<T, ConnectError>
    where
        T: DeserializeOwned + Send,
    {
        tracing::trace!(url = %url, "1Password Connect request");
        outside_runtime(|| {
            let mut request = self
                .http
                .get(url)
                .bearer_auth(self.token.expose_secret());
            if let Some(filter) = filter {
                request = request.query(&[("filter", filter)]);
            }

            let response = request.send().map_err(ConnectError::Network)?;
            Self::decode(response)
        })
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ConnectError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().map_err(ConnectError::Decode);
        }

        let message = response
            .json::<ApiErrorBody>()
            .ok()
            .map(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ConnectError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            StatusCode::NOT_FOUND => ConnectError::NotFound { message },
            _ => ConnectError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

impl ConnectClient for HttpConnectClient {
    fn get_vaults_by_title(&self, title: &str) -> Result<Vec<Vault>, ConnectError> {
        let url = self.endpoint(&["v1", "vaults"])?;
        self.get(url, Some(filter_eq("name", title)))
    }

    fn get_item_by_title(&self, title: &str, vault_id: &str) -> Result<Item, ConnectError> {
        let url = self.endpoint(&["v1", "vaults", vault_id, "items"])?;
        let summaries: Vec<Item> = self.get(url, Some(filter_eq("title", title)))?;

        let summary = match summaries.as_slice() {
            [] => {
                return Err(ConnectError::ItemNotFound {
                    title: title.to_string(),
                    vault_id: vault_id.to_string(),
                });
            }
            [one] => one,
            many => {
                return Err(ConnectError::AmbiguousItem {
                    title: title.to_string(),
                    vault_id: vault_id.to_string(),
                    count: many.len(),
                });
            }
        };

        let url = self.endpoint(&["v1", "vaults", vault_id, "items", &summary.id])?;
        self.get(url, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let client = HttpConnectClient::new("http://localhost:8080/", "token").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_filter_escapes_quotes_and_backslashes() {
        assert_eq!(filter_eq("name", "Engineering"), r#"name eq "Engineering""#);
        assert_eq!(
            filter_eq("title", r#"db "prod" \ creds"#),
            r#"title eq "db \"prod\" \\ creds""#
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = HttpConnectClient::new("http://localhost:8080/connect/", "token").unwrap();
        let url = client
            .endpoint(&["v1", "vaults", "eng/ops ?", "items"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/connect/v1/vaults/eng%2Fops%20%3F/items"
        );
    }

    #[test]
    fn test_endpoint_rejects_unusable_base_url() {
        let client = HttpConnectClient::new("not a url", "token").unwrap();
        let err = client.endpoint(&["v1", "vaults"]).unwrap_err();
        assert!(matches!(err, ConnectError::InvalidHost { host } if host == "not a url"));

        let client = HttpConnectClient::new("mailto:ops@example.com", "token").unwrap();
        assert!(matches!(
            client.get_vaults_by_title("Engineering"),
            Err(ConnectError::InvalidHost { .. })
        ));
    }

    #[test]
    fn test_with_timeout_rebuilds_client() {
        let client = HttpConnectClient::new("http://localhost:8080", "token")
            .and_then(|client| client.with_timeout(Duration::from_secs(1)))
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_client_usable_inside_runtime() {
        let client = HttpConnectClient::new("http://127.0.0.1:9", "token").unwrap();
        let err = client.get_vaults_by_title("Engineering").unwrap_err();
        assert!(matches!(err, ConnectError::Network(_)));
    }

    #[test]
    fn test_user_agent_contains_version() {
        assert!(HttpConnectClient::user_agent().starts_with("opfield-connect/"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = HttpConnectClient::new("http://localhost:8080", "super-secret").unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("localhost:8080"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_from_environment_missing_host() {
        temp_env::with_vars(
            [
                (CONNECT_HOST_ENV, None::<&str>),
                (CONNECT_TOKEN_ENV, Some("token")),
            ],
            || {
                let result = HttpConnectClient::from_environment();
                assert!(matches!(result, Err(ConnectError::MissingHost)));
            },
        );
    }

    #[test]
    fn test_from_environment_empty_token() {
        temp_env::with_vars(
            [
                (CONNECT_HOST_ENV, Some("http://localhost:8080")),
                (CONNECT_TOKEN_ENV, Some("")),
            ],
            || {
                let result = HttpConnectClient::from_environment();
                assert!(matches!(result, Err(ConnectError::MissingToken)));
            },
        );
    }

    #[test]
    fn test_from_environment_invalid_host() {
        temp_env::with_vars(
            [
                (CONNECT_HOST_ENV, Some("not a url")),
                (CONNECT_TOKEN_ENV, Some("token")),
            ],
            || {
                let result = HttpConnectClient::from_environment();
                assert!(matches!(result, Err(ConnectError::InvalidHost { .. })));
            },
        );
    }

    #[test]
    fn test_from_environment_ok() {
        temp_env::with_vars(
            [
                (CONNECT_HOST_ENV, Some("https://connect.example.com/")),
                (CONNECT_TOKEN_ENV, Some("token")),
            ],
            || {
                let client = HttpConnectClient::from_environment().unwrap();
                assert_eq!(client.base_url(), "https://connect.example.com");
            },
        );
    }
}
