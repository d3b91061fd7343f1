//! Client configuration and base URL validation.

use url::Url;

/// `User-Agent` sent with every probe request.
pub const DEFAULT_USER_AGENT: &str = "b2share-unified-nagios/1.1 (+nagios)";

/// Configuration for [`B2ShareClient`](crate::B2ShareClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the B2SHARE instance.
    pub base_url: Url,
    /// Verify the server's TLS certificate.
    pub verify_tls: bool,
    /// Honor `HTTP_PROXY` / `HTTPS_PROXY` / `NO_PROXY` from the environment.
    pub use_proxy: bool,
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration with TLS verification on and environment proxies off.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            verify_tls: true,
            use_proxy: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(uri: &str) -> Result<Self, ConfigError> {
        parse_base_url(uri).map(Self::new)
    }

    /// Base URL without trailing slashes, ready for path concatenation.
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

/// Parse and check a user-supplied base URL.
///
/// The URL must be absolute, use `http` or `https`, and name a host.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] describing the first problem found.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl(raw.to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("no host supplied".to_string()));
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL {0}: {1}")]
    InvalidUrl(String, String),
}
