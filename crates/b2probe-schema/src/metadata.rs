//! # Schema Discovery and Derivation
//!
//! A B2SHARE record points at the JSON Schema describing it. RDM-based
//! instances expose the link as a top-level `$schema` or as
//! `links.$schema`; v2 instances keep it inside `metadata.$schema`.
//!
//! RDM record schemas describe the whole record (access, files, pids, ...).
//! The probe only validates the `metadata` part, so
//! [`build_metadata_schema`] lifts `properties.metadata` out into a
//! standalone schema document.

use serde_json::{Map, Value};

use crate::error::SchemaError;

/// `$schema` declarator used when the parent schema declares none.
pub const DEFAULT_SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// Locate the schema URL of an RDM-style record.
///
/// Returns `record["$schema"]` when present, else `record["links"]["$schema"]`.
///
/// # Errors
///
/// Returns [`SchemaError::SchemaUrlNotFound`] when neither location holds a
/// string. Callers fall back to [`legacy_schema_url`].
pub fn discover_schema_url(record: &Value) -> Result<&str, SchemaError> {
    if let Some(url) = record.get("$schema") {
        return url.as_str().ok_or(SchemaError::SchemaUrlNotFound {
            location: "$schema",
        });
    }
    record
        .get("links")
        .and_then(|links| links.get("$schema"))
        .and_then(Value::as_str)
        .ok_or(SchemaError::SchemaUrlNotFound {
            location: "links.$schema",
        })
}

/// Locate the schema URL of a v2 record at `record["metadata"]["$schema"]`.
pub fn legacy_schema_url(record: &Value) -> Result<&str, SchemaError> {
    record
        .get("metadata")
        .and_then(|metadata| metadata.get("$schema"))
        .and_then(Value::as_str)
        .ok_or(SchemaError::SchemaUrlNotFound {
            location: "metadata.$schema",
        })
}

/// Schema URL of `record`, trying the RDM locations before the v2 one.
pub fn record_schema_url(record: &Value) -> Result<&str, SchemaError> {
    match discover_schema_url(record) {
        Ok(url) => Ok(url),
        Err(err) => {
            tracing::debug!("{err}; falling back to metadata.$schema");
            legacy_schema_url(record)
        }
    }
}

/// Derive a metadata-only schema from a full record schema.
///
/// The result carries the parent's `$schema` declarator (or
/// [`DEFAULT_SCHEMA_DIALECT`]) followed by every key of
/// `parent.properties.metadata`. A `$schema` inside the metadata
/// sub-schema wins over the parent's.
///
/// # Errors
///
/// Returns [`SchemaError::MissingMetadataSchema`] when `properties.metadata`
/// is absent or not a mapping.
pub fn build_metadata_schema(parent: &Value) -> Result<Value, SchemaError> {
    let metadata = parent
        .get("properties")
        .and_then(|props| props.get("metadata"))
        .and_then(Value::as_object)
        .ok_or(SchemaError::MissingMetadataSchema)?;

    let dialect = parent
        .get("$schema")
        .cloned()
        .unwrap_or_else(|| Value::String(DEFAULT_SCHEMA_DIALECT.to_string()));

    let mut schema = Map::with_capacity(metadata.len() + 1);
    schema.insert("$schema".to_string(), dialect);
    for (key, value) in metadata {
        schema.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(schema))
}
