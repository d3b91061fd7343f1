//! Integration test: sanitize and validate RDM-shaped record metadata
//! against a metadata-only schema derived from a full record schema.
//!
//! The record and schema below follow the layout served by RDM-based
//! B2SHARE instances: a draft-07 record schema whose `properties.metadata`
//! constrains the structural fields, and a record whose metadata has been
//! enriched with vocabulary display fields.

use b2probe_schema::{
    build_metadata_schema, check_schema, record_schema_url, MetadataValidator, Sanitizer,
    SchemaDraft, SchemaError, TitleRule, VocabularyReport,
};
use serde_json::{json, Value};

const SCHEMA_URL: &str = "https://b2share.example/api/schemas/records/record-v6.0.0.json";

fn record_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "$id": SCHEMA_URL,
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "metadata": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "title": {"type": "string"},
                    "resource_type": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {"id": {"type": "string"}},
                        "required": ["id"]
                    },
                    "rights": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "additionalProperties": false,
                            "properties": {"id": {"type": "string"}}
                        }
                    },
                    "creators": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "person_or_org": {"type": "object"},
                                "affiliations": {
                                    "type": "array",
                                    "items": {
                                        "type": "object",
                                        "additionalProperties": false,
                                        "properties": {
                                            "id": {"type": "string"},
                                            "name": {"type": "string"}
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "required": ["title", "resource_type"]
            }
        }
    })
}

fn enriched_record() -> Value {
    json!({
        "id": "abcd-1234",
        "links": {
            "self": "https://b2share.example/api/records/abcd-1234",
            "files": "https://b2share.example/api/records/abcd-1234/files",
            "$schema": SCHEMA_URL
        },
        "metadata": {
            "title": "Sea surface temperatures 2021",
            "resource_type": {
                "id": "dataset",
                "title": {"en": "Dataset"},
                "props": {"csl": "dataset"}
            },
            "rights": [{
                "id": "cc-by-4.0",
                "title": {"en": "Creative Commons Attribution 4.0"},
                "description": {"en": "Permits almost any use"},
                "icon": "cc-by-icon",
                "props": {"scheme": "spdx"}
            }],
            "creators": [{
                "person_or_org": {"name": "Doe, Jane", "type": "personal"},
                "affiliations": [{"id": "01ggx4157", "name": "CERN", "title": "CERN"}]
            }]
        }
    })
}

fn metadata_validator(parent: &Value) -> MetadataValidator {
    check_schema(parent, SchemaDraft::Draft7).expect("record schema is draft-07");
    let md_schema = build_metadata_schema(parent).expect("schema defines metadata");
    MetadataValidator::new(&md_schema, SchemaDraft::Draft7, Some((SCHEMA_URL, parent)))
        .expect("metadata schema compiles")
}

#[test]
fn schema_url_is_discovered_from_links() {
    assert_eq!(record_schema_url(&enriched_record()).unwrap(), SCHEMA_URL);
}

#[test]
fn enriched_metadata_fails_literal_validation() {
    let parent = record_schema();
    let validator = metadata_validator(&parent);
    let record = enriched_record();

    let err = validator.validate(&record["metadata"]).unwrap_err();
    match err {
        SchemaError::ValidationFailed { violations, .. } => {
            assert!(violations.len() >= 2, "got: {violations}");
        }
        other => panic!("Expected ValidationFailed, got: {other}"),
    }
}

#[test]
fn sanitized_metadata_validates() {
    let parent = record_schema();
    let validator = metadata_validator(&parent);
    let record = enriched_record();

    let mut report = VocabularyReport::new();
    let cleaned = Sanitizer::default().sanitize(&record["metadata"], Some(&mut report));
    validator.validate(&cleaned).unwrap();

    assert_eq!(
        report.summary(),
        vec![
            "creators[].affiliations[].title",
            "resource_type.props",
            "resource_type.title",
            "rights[].description",
            "rights[].icon",
            "rights[].props",
            "rights[].title",
        ]
    );
}

#[test]
fn strict_scan_flags_the_same_fields_without_stripping() {
    let record = enriched_record();
    let snapshot = record.clone();

    let sanitizer = Sanitizer::default();
    let scanned = sanitizer.scan(&record["metadata"]);
    let mut collected = VocabularyReport::new();
    let _ = sanitizer.sanitize(&record["metadata"], Some(&mut collected));

    assert_eq!(scanned.summary(), collected.summary());
    assert_eq!(record, snapshot);
}

#[test]
fn unless_described_rule_keeps_rights_titles() {
    let record = enriched_record();
    let report = Sanitizer::new(TitleRule::UnlessDescribed).scan(&record["metadata"]);
    let summary = report.summary();
    assert!(summary.contains(&"resource_type.title"));
    assert!(!summary.contains(&"rights[].title"));
}

#[test]
fn scenario_rights_object_against_closed_schema() {
    let parent = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "properties": {
            "metadata": {
                "type": "object",
                "properties": {
                    "rights": {
                        "type": "object",
                        "properties": {"id": {"type": "string"}},
                        "additionalProperties": false
                    }
                }
            }
        }
    });
    let metadata = json!({
        "rights": {"id": "cc-by", "title": "CC BY", "description": "...", "icon": "x"}
    });

    let validator = metadata_validator(&parent);
    assert!(validator.validate(&metadata).is_err());

    let mut report = VocabularyReport::new();
    let cleaned = Sanitizer::default().sanitize(&metadata, Some(&mut report));
    validator.validate(&cleaned).unwrap();
    assert_eq!(
        report.summary(),
        vec!["rights.description", "rights.icon", "rights.title"]
    );
}
