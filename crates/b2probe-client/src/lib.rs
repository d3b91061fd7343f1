//! # b2probe-client : HTTP access to a B2SHARE instance
//!
//! A thin typed client for the four endpoints the probe touches:
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET  | `{base}/api/records?sort=newest&size=10` | [`B2ShareClient::search_records`] |
//! | GET  | record, schema, and bucket URLs taken from responses | [`B2ShareClient::get_json`] |
//! | HEAD | first file of the bucket | [`B2ShareClient::check_file`] |
//!
//! ## Timeouts
//!
//! There is no client-wide timeout. Every call takes a [`Deadline`] and is
//! bounded by [`Deadline::remaining`].
//!
//! ## Retry
//!
//! None. The first failure ends the probe run.

pub mod config;
pub mod deadline;
pub mod error;
pub mod types;

pub use config::{parse_base_url, ClientConfig, ConfigError};
pub use deadline::{Deadline, MAX_BUDGET, MIN_REQUEST_TIMEOUT};
pub use error::ClientError;
pub use types::{files_url, first_file_url, BucketShape, SearchHits};

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::redirect;
use serde_json::Value;

/// Path and query of the record listing.
const SEARCH_PATH: &str = "/api/records?sort=newest&size=10";

/// Client for one B2SHARE instance.
#[derive(Debug, Clone)]
pub struct B2ShareClient {
    http: reqwest::Client,
    /// Same settings as `http` but never follows redirects; used for the
    /// file existence check.
    head_http: reqwest::Client,
    base_url: String,
}

impl B2ShareClient {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = http_builder(config).build().map_err(ClientError::Build)?;
        let head_http = http_builder(config)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            head_http,
            base_url: config.base_url_trimmed().to_string(),
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.base_url)
    }

    /// List the newest public records.
    ///
    /// Calls `GET {base_url}/api/records?sort=newest&size=10`.
    pub async fn search_records(&self, deadline: &Deadline) -> Result<SearchHits, ClientError> {
        let response = self.get_json(&self.search_url(), deadline).await?;
        SearchHits::from_response(&response)
    }

    /// GET `url` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on transport failure, [`ClientError::Status`]
    /// on a non-2xx answer, [`ClientError::Decode`] if the body is not JSON.
    pub async fn get_json(&self, url: &str, deadline: &Deadline) -> Result<Value, ClientError> {
        let endpoint = format!("GET {url}");
        tracing::debug!("Making a HTTP GET request to {url}");

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .timeout(deadline.remaining())
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(ClientError::Status {
                endpoint,
                status: resp.status(),
            });
        }

        resp.json().await.map_err(|e| ClientError::Decode {
            endpoint,
            source: e,
        })
    }

    /// HEAD `url` to confirm the file is reachable without downloading it.
    ///
    /// Redirects are not followed; a 3xx answer counts as reachable.
    pub async fn check_file(&self, url: &str, deadline: &Deadline) -> Result<(), ClientError> {
        let endpoint = format!("HEAD {url}");
        tracing::debug!("Making a HTTP HEAD request to {url}");

        let resp = self
            .head_http
            .head(url)
            .timeout(deadline.remaining())
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(ClientError::Status { endpoint, status })
        }
    }
}

fn http_builder(config: &ClientConfig) -> reqwest::ClientBuilder {
    let builder = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(!config.verify_tls);
    if config.use_proxy {
        builder
    } else {
        builder.no_proxy()
    }
}
