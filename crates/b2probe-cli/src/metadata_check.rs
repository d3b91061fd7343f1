//! # Record Metadata Check
//!
//! Picks the validation path for a fetched record from the shape of its file
//! bucket:
//!
//! | Shape | Mode | Draft | Instance | On violation |
//! |-------|------|-------|----------|--------------|
//! | Legacy | any | draft-04 | raw `metadata` vs. record schema | CRITICAL |
//! | Modern | strict | draft-07 | raw `metadata` vs. metadata-only schema | CRITICAL |
//! | Modern | lenient | draft-07 | sanitized `metadata` vs. metadata-only schema | WARNING |
//!
//! Meta-validation of the record schema and derivation of the metadata-only
//! schema are fatal in every mode.

use std::io::Write;

use serde_json::Value;

use b2probe_client::{BucketShape, ClientError};
use b2probe_schema::{
    build_metadata_schema, check_schema, validate_instance, SchemaDraft, SchemaError,
    VocabularyReport,
};

use crate::args::{MetadataOptions, ValidationMode};
use crate::verdict::{ProbeError, Status};

/// Result of a metadata check that did not end the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataVerdict {
    Valid,
    /// Lenient mode only: the sanitized metadata still did not validate.
    /// The violations were logged as a warning.
    Tolerated,
}

/// Validate `record`'s metadata against `schema`, fetched from `schema_url`.
///
/// Vocabulary reports are written to `out`.
///
/// # Errors
///
/// Any [`SchemaError`] in legacy and strict mode, schema check and derivation
/// failures in lenient mode, and [`ClientError::MissingField`] when the record
/// has no `metadata`.
pub fn check_record_metadata(
    record: &Value,
    schema_url: &str,
    schema: &Value,
    shape: BucketShape,
    options: &MetadataOptions,
    out: &mut dyn Write,
) -> Result<MetadataVerdict, ProbeError> {
    let metadata = record.get("metadata").ok_or(ClientError::MissingField {
        context: "record",
        field: "metadata",
    })?;
    let parent = Some((schema_url, schema));

    match (shape, options.mode) {
        (BucketShape::Legacy, _) => {
            tracing::info!("Validating record's metadata schema.");
            check_schema(schema, SchemaDraft::Draft4)?;
            tracing::info!("Validating record against metadata schema.");
            validate_instance(metadata, schema, SchemaDraft::Draft4, parent)?;
            Ok(MetadataVerdict::Valid)
        }
        (BucketShape::Modern, mode) => {
            tracing::info!("Validating parent record schema ({}).", SchemaDraft::Draft7);
            check_schema(schema, SchemaDraft::Draft7)?;
            tracing::info!("Building metadata-only schema from parent schema.");
            let metadata_schema = build_metadata_schema(schema)?;

            match mode {
                ValidationMode::Strict => {
                    strict(metadata, &metadata_schema, parent, options, out)
                }
                ValidationMode::Lenient => {
                    lenient(metadata, &metadata_schema, parent, options, out)
                }
            }
        }
    }
}

fn strict(
    metadata: &Value,
    metadata_schema: &Value,
    parent: Option<(&str, &Value)>,
    options: &MetadataOptions,
    out: &mut dyn Write,
) -> Result<MetadataVerdict, ProbeError> {
    // Scan only; strict mode validates what the server sent.
    if options.report || options.debug_vocab {
        let report = options.sanitizer().scan(metadata);
        if options.report {
            write_report(out, &report)?;
        }
    }
    tracing::info!("Validating record's metadata against metadata schema (strict).");
    validate_instance(metadata, metadata_schema, SchemaDraft::Draft7, parent)?;
    Ok(MetadataVerdict::Valid)
}

fn lenient(
    metadata: &Value,
    metadata_schema: &Value,
    parent: Option<(&str, &Value)>,
    options: &MetadataOptions,
    out: &mut dyn Write,
) -> Result<MetadataVerdict, ProbeError> {
    let mut report = VocabularyReport::new();
    let cleaned = options.sanitizer().sanitize(metadata, Some(&mut report));
    tracing::info!(
        stripped = report.len(),
        "Validating record's metadata against metadata schema (lenient)."
    );
    let result = validate_instance(&cleaned, metadata_schema, SchemaDraft::Draft7, parent);

    if options.report {
        write_report(out, &report)?;
    }

    match result {
        Ok(()) => Ok(MetadataVerdict::Valid),
        Err(err) => {
            tracing::warn!("{}: metadata validation (lenient) failed: {err}", Status::Warning);
            Ok(MetadataVerdict::Tolerated)
        }
    }
}

fn write_report(out: &mut dyn Write, report: &VocabularyReport) -> Result<(), ProbeError> {
    writeln!(out, "{report}")?;
    Ok(())
}
