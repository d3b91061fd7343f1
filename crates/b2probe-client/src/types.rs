//! # Response Views
//!
//! The probe reads only a handful of fields from each B2SHARE response, so
//! responses stay as `serde_json::Value` and these helpers pull out what is
//! needed. Field lookups that fail become [`ClientError::MissingField`].
//!
//! | Response | Fields read |
//! |----------|-------------|
//! | search listing | `hits.total`, `hits.hits[].files`, `hits.hits[].links.self` |
//! | record | `links.files` (schema links are read by `b2probe-schema`) |
//! | file bucket | `entries[0].links.self` or `contents[0].links.self` |

use serde_json::Value;

use crate::error::ClientError;

/// Record listing returned by `GET /api/records`.
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    /// Total number of public records the instance reports.
    pub total: u64,
    /// Listed records, newest first.
    pub hits: Vec<Value>,
}

impl SearchHits {
    /// Read a search response.
    ///
    /// `hits.total` may be a plain number (Elasticsearch 6, B2SHARE v2) or
    /// an object `{"value": n}` (Elasticsearch 7+, RDM). A missing total
    /// counts as zero.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidField`] when the total is present but is
    /// not a non-negative whole number.
    pub fn from_response(response: &Value) -> Result<Self, ClientError> {
        let outer = response.get("hits");
        let total = match outer.and_then(|hits| hits.get("total")) {
            None | Some(Value::Null) => 0,
            Some(Value::Object(total)) => match total.get("value") {
                None | Some(Value::Null) => 0,
                Some(value) => count(value)?,
            },
            Some(value) => count(value)?,
        };
        let hits = outer
            .and_then(|hits| hits.get("hits"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(Self { total, hits })
    }

    /// URL of the record to probe: the first listed record exposing files,
    /// else the first listed record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingField`] when the listing is empty or the
    /// chosen record has no `links.self`.
    pub fn record_url(&self) -> Result<&str, ClientError> {
        let chosen = match self.hits.iter().find(|hit| hit.get("files").is_some_and(is_truthy)) {
            Some(hit) => {
                tracing::info!("A record containing files was found.");
                hit
            }
            None => {
                tracing::info!("No records containing files were found.");
                tracing::info!("Fetching a record without files.");
                self.hits.first().ok_or(ClientError::MissingField {
                    context: "search response",
                    field: "hits.hits[0]",
                })?
            }
        };
        link(chosen, "self").ok_or(ClientError::MissingField {
            context: "search hit",
            field: "links.self",
        })
    }
}

/// Bucket conventions of the two B2SHARE API generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketShape {
    /// RDM-based API: files listed under `entries`.
    Modern,
    /// B2SHARE v2 API: files listed under `contents`.
    Legacy,
}

impl BucketShape {
    /// Classify a file bucket response. Buckets with neither `entries` nor
    /// `contents` are treated as legacy.
    pub fn resolve(bucket: &Value) -> Self {
        if bucket.get("entries").is_some() {
            Self::Modern
        } else {
            Self::Legacy
        }
    }

    /// Key holding the file descriptors.
    pub fn files_key(self) -> &'static str {
        match self {
            Self::Modern => "entries",
            Self::Legacy => "contents",
        }
    }

    pub fn api_version(self) -> &'static str {
        match self {
            Self::Modern => "v3",
            Self::Legacy => "v2",
        }
    }
}

/// URL of the file bucket of `record`.
pub fn files_url(record: &Value) -> Result<&str, ClientError> {
    link(record, "files").ok_or(ClientError::MissingField {
        context: "record",
        field: "links.files",
    })
}

/// URL of the first file listed in `bucket`.
///
/// # Errors
///
/// Returns [`ClientError::MissingField`] when the files key is missing or a
/// descriptor has no `links.self`, and [`ClientError::EmptyBucket`] when the
/// list is empty.
pub fn first_file_url<'a>(
    bucket: &'a Value,
    shape: BucketShape,
    bucket_url: &str,
) -> Result<&'a str, ClientError> {
    let files = bucket
        .get(shape.files_key())
        .and_then(Value::as_array)
        .ok_or(ClientError::MissingField {
            context: "file bucket",
            field: shape.files_key(),
        })?;
    let first = files.first().ok_or_else(|| ClientError::EmptyBucket {
        url: bucket_url.to_string(),
    })?;
    link(first, "self").ok_or(ClientError::MissingField {
        context: "file descriptor",
        field: "links.self",
    })
}

/// Whole-number hit count. Integral floats such as `3.0` are accepted.
fn count(value: &Value) -> Result<u64, ClientError> {
    let invalid = || ClientError::InvalidField {
        context: "search response",
        field: "hits.total",
        value: value.to_string(),
    };
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(invalid()),
    }
}

fn link<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    value.get("links")?.get(name)?.as_str()
}

/// Truthiness of a JSON value: empty containers, empty strings, zero,
/// `false`, and `null` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
