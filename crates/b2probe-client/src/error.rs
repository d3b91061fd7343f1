//! B2SHARE client error types.

/// Errors from B2SHARE API calls and response inspection.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    /// HTTP transport error (connection refused, timeout, TLS failure).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },
    /// The response body was not the expected JSON.
    #[error("failed to decode JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },
    /// A field the probe needs is absent from a response.
    #[error("missing field '{field}' in {context}")]
    MissingField {
        /// Which response was inspected.
        context: &'static str,
        /// Dotted path of the missing field.
        field: &'static str,
    },
    /// A field is present but holds a value the probe cannot use.
    #[error("invalid value {value} for '{field}' in {context}")]
    InvalidField {
        context: &'static str,
        field: &'static str,
        value: String,
    },
    /// The file bucket has no file descriptors.
    #[error("file bucket at {url} lists no files")]
    EmptyBucket { url: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ClientError {
    /// True for transport-level timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http { source, .. } if source.is_timeout())
    }
}
