//! Schema discovery and validation error types.

use thiserror::Error;

use crate::validate::{SchemaDraft, ValidationViolations};

/// Errors raised while locating, deriving, checking, or applying a
/// metadata schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The record carries no usable schema reference at the given location.
    #[error("record has no schema reference at '{location}'")]
    SchemaUrlNotFound {
        /// Key path that was consulted.
        location: &'static str,
    },

    /// The record schema has no object-shaped `properties.metadata`.
    #[error("Record schema does not define 'properties.metadata'")]
    MissingMetadataSchema,

    /// The schema document is not a valid schema for its draft.
    #[error("invalid {draft} schema: {reason}")]
    InvalidSchema {
        /// Draft the schema was checked against.
        draft: SchemaDraft,
        /// First meta-validation failure.
        reason: String,
    },

    /// The validator could not be compiled (unresolvable `$ref`, bad regex).
    #[error("cannot compile {draft} validator: {reason}")]
    ValidatorBuild {
        draft: SchemaDraft,
        reason: String,
    },

    /// The instance did not conform to the schema.
    #[error("metadata does not conform to {draft} schema: {violations}")]
    ValidationFailed {
        draft: SchemaDraft,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },
}
