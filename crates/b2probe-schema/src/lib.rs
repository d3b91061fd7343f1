//! # b2probe-schema : Metadata Sanitization & Schema Validation
//!
//! The schema half of the B2SHARE probe.
//!
//! ## Sanitization (`sanitize`)
//!
//! [`Sanitizer`] strips controlled-vocabulary enrichment (icons, tags,
//! titles next to ids, ...) from RDM metadata before it is validated, and
//! [`Sanitizer::scan`] reports the same fields without touching the tree.
//!
//! ## Discovery (`metadata`)
//!
//! - [`discover_schema_url`] / [`legacy_schema_url`]: where the record
//!   points at its schema.
//! - [`build_metadata_schema`]: lift `properties.metadata` out of a full
//!   record schema.
//!
//! ## Validation (`validate`)
//!
//! [`check_schema`] meta-validates a schema for its draft and
//! [`MetadataValidator`] validates instances, collecting structured
//! [`Violation`]s.
//!
//! ## Crate Policy
//!
//! - No network access. Remote `$ref`s are answered from memory.
//! - Sanitization never fails and never mutates its input.

pub mod error;
pub mod metadata;
pub mod sanitize;
pub mod validate;

pub use error::SchemaError;
pub use metadata::{
    build_metadata_schema, discover_schema_url, legacy_schema_url, record_schema_url,
    DEFAULT_SCHEMA_DIALECT,
};
pub use sanitize::{Sanitizer, TitleRule, VocabularyReport, VOCABULARY_EXTRA_KEYS};
pub use validate::{
    check_schema, validate_instance, MetadataValidator, SchemaDraft, ValidationViolations,
    Violation,
};
