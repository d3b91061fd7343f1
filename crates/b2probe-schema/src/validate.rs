//! # Schema Validation
//!
//! Draft-gated validation of record metadata with the `jsonschema` crate.
//!
//! B2SHARE v2 publishes draft-04 community schemas; RDM-based instances
//! publish draft-07 record schemas. The draft is chosen by the caller from
//! the bucket shape, never guessed from the document.
//!
//! ## Schema Resolution
//!
//! Validators are compiled with a local retriever. The fetched parent
//! schema is registered under its fetch URL and its own `$id` (`id` for
//! draft-04), so remote `$ref`s back into the parent resolve without a
//! second request. Any other remote reference resolves to a permissive
//! empty schema. Validation never touches the network.

use std::collections::HashMap;
use std::fmt;

use jsonschema::{Draft, Retrieve, Uri, ValidationOptions, Validator};
use serde_json::Value;

use crate::error::SchemaError;

/// JSON Schema drafts published by B2SHARE instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDraft {
    /// B2SHARE v2 community schemas.
    Draft4,
    /// InvenioRDM record schemas.
    Draft7,
}

impl SchemaDraft {
    fn as_jsonschema(self) -> Draft {
        match self {
            Self::Draft4 => Draft::Draft4,
            Self::Draft7 => Draft::Draft7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft4 => "draft-04",
            Self::Draft7 => "draft-07",
        }
    }
}

impl fmt::Display for SchemaDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that `schema` is itself a valid schema for `draft`.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidSchema`] with the first meta-validation
/// failure.
pub fn check_schema(schema: &Value, draft: SchemaDraft) -> Result<(), SchemaError> {
    let result = match draft {
        SchemaDraft::Draft4 => jsonschema::draft4::meta::validate(schema),
        SchemaDraft::Draft7 => jsonschema::draft7::meta::validate(schema),
    };
    result.map_err(|e| SchemaError::InvalidSchema {
        draft,
        reason: e.to_string(),
    })
}

/// Retriever that serves known schemas from memory.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let without_fragment = uri_str.split('#').next().unwrap_or(uri_str);

        for candidate in [uri_str, without_fragment] {
            if let Some(value) = self.schemas_by_uri.get(candidate) {
                return Ok(value.clone());
            }
        }

        tracing::warn!(uri = uri_str, "unresolved schema reference, accepting any value");
        Ok(serde_json::json!({}))
    }
}

/// A single validation violation.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer to the keyword in the schema that failed.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
///
/// Displays on a single line so it fits a monitoring status line.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled validator for one schema under one draft.
pub struct MetadataValidator {
    draft: SchemaDraft,
    validator: Validator,
}

impl fmt::Debug for MetadataValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataValidator")
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

impl MetadataValidator {
    /// Compile `schema` under `draft`.
    ///
    /// `parent` is the fetched record schema and the URL it came from;
    /// it is registered for `$ref` resolution.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidatorBuild`] if the schema cannot be compiled.
    pub fn new(
        schema: &Value,
        draft: SchemaDraft,
        parent: Option<(&str, &Value)>,
    ) -> Result<Self, SchemaError> {
        let opts = build_options(draft, parent);
        let validator = opts.build(schema).map_err(|e| SchemaError::ValidatorBuild {
            draft,
            reason: e.to_string(),
        })?;
        Ok(Self { draft, validator })
    }

    /// Validate `instance`, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidationFailed`] if the instance is invalid.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaError> {
        let errors: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                draft: self.draft,
                violations: ValidationViolations { violations: errors },
            })
        }
    }
}

/// Compile `schema` under `draft` and validate `instance` against it.
pub fn validate_instance(
    instance: &Value,
    schema: &Value,
    draft: SchemaDraft,
    parent: Option<(&str, &Value)>,
) -> Result<(), SchemaError> {
    MetadataValidator::new(schema, draft, parent)?.validate(instance)
}

fn build_options(draft: SchemaDraft, parent: Option<(&str, &Value)>) -> ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(draft.as_jsonschema());

    let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
    if let Some((url, schema)) = parent {
        let ids = ["$id", "id"]
            .into_iter()
            .filter_map(|key| schema.get(key).and_then(Value::as_str));
        for uri in std::iter::once(url).chain(ids) {
            let without_fragment = uri.split('#').next().unwrap_or(uri);
            schemas_by_uri.insert(uri.to_string(), schema.clone());
            schemas_by_uri.insert(without_fragment.to_string(), schema.clone());
        }
    }
    opts.with_retriever(LocalSchemaRetriever { schemas_by_uri });

    opts
}
