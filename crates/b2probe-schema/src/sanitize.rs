//! # Vocabulary Sanitizer
//!
//! InvenioRDM-based B2SHARE instances enrich record metadata with display
//! fields pulled from controlled vocabularies (icons, tags, human readable
//! titles, descriptions). The structural metadata schema does not declare
//! them, so validating the enriched document literally produces false
//! positives.
//!
//! [`Sanitizer::sanitize`] strips those fields and returns a cleaned copy.
//! [`Sanitizer::scan`] walks the same tree with the same removal predicate
//! and only reports what would be stripped.
//!
//! ## Paths
//!
//! Removed fields are reported as dotted paths. Sequence traversal appends
//! `[]` to the current segment, so a title inside the affiliations of a
//! creator is reported as `creators[].affiliations[].title`.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};

/// Keys removed unconditionally wherever they appear as a direct key of a
/// mapping. Kept sorted; changing this set changes which documents pass
/// lenient validation.
pub const VOCABULARY_EXTRA_KEYS: &[&str] = &[
    "description",
    "icon",
    "identifier",
    "identifiers",
    "links",
    "props",
    "scheme",
    "tags",
    "uri",
];

/// When a `title` next to an `id` counts as vocabulary enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleRule {
    /// Drop `title` from every mapping that also has an `id`.
    #[default]
    WhenIdPresent,
    /// Drop `title` only when the mapping has an `id` and carries neither
    /// `description` nor `link`. Rights entries keep their title.
    UnlessDescribed,
}

impl TitleRule {
    fn drops_title(self, obj: &Map<String, Value>) -> bool {
        if !obj.contains_key("id") || !obj.contains_key("title") {
            return false;
        }
        match self {
            Self::WhenIdPresent => true,
            Self::UnlessDescribed => {
                !obj.contains_key("description") && !obj.contains_key("link")
            }
        }
    }
}

/// Paths of fields removed (or flagged) during one pass, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyReport {
    paths: Vec<String>,
}

impl VocabularyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>) {
        self.paths.push(path.into());
    }

    /// Number of recorded paths, duplicates included.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Recorded paths in traversal order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Deduplicated paths in lexicographic order.
    pub fn summary(&self) -> Vec<&str> {
        self.paths
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl fmt::Display for VocabularyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary();
        write!(f, "Vocabulary-like fields ({}):", summary.len())?;
        for path in summary {
            write!(f, "\n  - {path}")?;
        }
        Ok(())
    }
}

/// Schema-driven metadata cleaner.
///
/// Pure and total: the input is never modified and every JSON value is
/// accepted. Unknown structures simply produce no removals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer {
    title_rule: TitleRule,
    trace: bool,
}

impl Sanitizer {
    pub fn new(title_rule: TitleRule) -> Self {
        Self {
            title_rule,
            trace: false,
        }
    }

    /// Emit a `DEBUG` event for every stripped or flagged field.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn title_rule(&self) -> TitleRule {
        self.title_rule
    }

    /// Return a copy of `value` with vocabulary enrichment removed.
    ///
    /// When `report` is given, the path of every removed key is appended
    /// to it.
    pub fn sanitize(&self, value: &Value, report: Option<&mut VocabularyReport>) -> Value {
        match report {
            Some(report) => self.sanitize_value(value, "", &mut |path: &str| report.push(path)),
            None => self.sanitize_value(value, "", &mut |_: &str| {}),
        }
    }

    /// Report what [`sanitize`](Self::sanitize) would remove, without
    /// building a cleaned tree.
    pub fn scan(&self, value: &Value) -> VocabularyReport {
        let mut report = VocabularyReport::new();
        self.scan_value(value, "", &mut |path: &str| report.push(path));
        report
    }

    fn is_removable(&self, obj: &Map<String, Value>, key: &str) -> bool {
        VOCABULARY_EXTRA_KEYS.contains(&key)
            || (key == "title" && self.title_rule.drops_title(obj))
    }

    fn record(&self, path: &str, sink: &mut dyn FnMut(&str)) {
        if self.trace {
            tracing::debug!(path, "vocabulary field");
        }
        sink(path);
    }

    fn sanitize_value(&self, value: &Value, path: &str, sink: &mut dyn FnMut(&str)) -> Value {
        match value {
            Value::Object(obj) => {
                let mut cleaned = Map::with_capacity(obj.len());
                for (key, child) in obj {
                    let child_path = key_path(path, key);
                    if self.is_removable(obj, key) {
                        self.record(&child_path, sink);
                        continue;
                    }
                    cleaned.insert(key.clone(), self.sanitize_value(child, &child_path, sink));
                }
                Value::Object(cleaned)
            }
            Value::Array(items) => {
                let item_path = item_path(path);
                Value::Array(
                    items
                        .iter()
                        .map(|item| self.sanitize_value(item, &item_path, sink))
                        .collect(),
                )
            }
            scalar => scalar.clone(),
        }
    }

    fn scan_value(&self, value: &Value, path: &str, sink: &mut dyn FnMut(&str)) {
        match value {
            Value::Object(obj) => {
                for (key, child) in obj {
                    let child_path = key_path(path, key);
                    if self.is_removable(obj, key) {
                        self.record(&child_path, sink);
                        continue;
                    }
                    self.scan_value(child, &child_path, sink);
                }
            }
            Value::Array(items) => {
                let item_path = item_path(path);
                for item in items {
                    self.scan_value(item, &item_path, sink);
                }
            }
            _ => {}
        }
    }
}

fn key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn item_path(parent: &str) -> String {
    format!("{parent}[]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn rights_metadata() -> Value {
        json!({
            "rights": {
                "id": "cc-by",
                "title": "CC BY",
                "description": "Creative Commons Attribution",
                "icon": "cc-by-icon"
            }
        })
    }

    #[test]
    fn strips_rights_enrichment() {
        let mut report = VocabularyReport::new();
        let cleaned = Sanitizer::default().sanitize(&rights_metadata(), Some(&mut report));

        assert_eq!(cleaned, json!({"rights": {"id": "cc-by"}}));
        assert_eq!(
            report.summary(),
            vec!["rights.description", "rights.icon", "rights.title"]
        );
    }

    #[test]
    fn input_is_not_modified() {
        let original = rights_metadata();
        let snapshot = original.clone();
        let _ = Sanitizer::default().sanitize(&original, None);
        assert_eq!(original, snapshot);
    }

    #[test]
    fn title_without_id_is_kept() {
        let doc = json!({"title": "My dataset", "creators": [{"name": "A"}]});
        let mut report = VocabularyReport::new();
        let cleaned = Sanitizer::default().sanitize(&doc, Some(&mut report));
        assert_eq!(cleaned, doc);
        assert!(report.is_empty());
    }

    #[test]
    fn sequence_paths_use_bracket_marker() {
        let doc = json!({
            "creators": [
                {
                    "person_or_org": {"name": "Doe, Jane"},
                    "affiliations": [{"id": "01ggx4157", "title": "CERN", "scheme": "ror"}]
                }
            ]
        });
        let mut report = VocabularyReport::new();
        let cleaned = Sanitizer::default().sanitize(&doc, Some(&mut report));

        assert_eq!(
            cleaned["creators"][0]["affiliations"][0],
            json!({"id": "01ggx4157"})
        );
        assert_eq!(
            report.paths(),
            &[
                "creators[].affiliations[].title".to_string(),
                "creators[].affiliations[].scheme".to_string(),
            ]
        );
    }

    #[test]
    fn root_sequence_path() {
        let doc = json!([{"icon": "x"}, {"tags": []}]);
        let report = Sanitizer::default().scan(&doc);
        assert_eq!(report.summary(), vec!["[].icon", "[].tags"]);
    }

    #[test]
    fn removed_subtrees_are_not_descended() {
        let doc = json!({"links": {"self": "https://example.org", "icon": "x"}});
        let report = Sanitizer::default().scan(&doc);
        assert_eq!(report.paths(), &["links".to_string()]);
    }

    #[test]
    fn scalars_pass_through() {
        for value in [json!(null), json!(true), json!(42), json!("text")] {
            assert_eq!(Sanitizer::default().sanitize(&value, None), value);
            assert!(Sanitizer::default().scan(&value).is_empty());
        }
    }

    #[test]
    fn surviving_key_order_is_preserved() {
        let doc = json!({"zeta": 1, "icon": "x", "alpha": 2, "mid": 3});
        let cleaned = Sanitizer::default().sanitize(&doc, None);
        let keys: Vec<&str> = cleaned
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn unless_described_keeps_rights_title() {
        let doc = json!({
            "rights": [{"id": "cc-by", "title": "CC BY", "link": "https://cc.org"}],
            "resource_type": {"id": "dataset", "title": "Dataset"}
        });
        let sanitizer = Sanitizer::new(TitleRule::UnlessDescribed);
        let report = sanitizer.scan(&doc);
        assert_eq!(report.summary(), vec!["resource_type.title"]);
    }

    #[test]
    fn report_summary_dedups_and_sorts() {
        let mut report = VocabularyReport::new();
        report.push("b.icon");
        report.push("a.title");
        report.push("b.icon");
        assert_eq!(report.len(), 3);
        assert_eq!(report.summary(), vec!["a.title", "b.icon"]);
    }

    #[test]
    fn report_display_lists_summary() {
        let report = Sanitizer::default().scan(&rights_metadata());
        let rendered = report.to_string();
        assert!(rendered.starts_with("Vocabulary-like fields (3):"));
        assert!(rendered.contains("\n  - rights.description"));
        assert!(rendered.ends_with("  - rights.title"));
    }

    #[test]
    fn extra_keys_are_sorted() {
        let mut sorted = VOCABULARY_EXTRA_KEYS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, VOCABULARY_EXTRA_KEYS);
    }

    #[test]
    #[traced_test]
    fn trace_emits_one_event_per_removed_field() {
        Sanitizer::default()
            .with_trace(true)
            .sanitize(&rights_metadata(), None);

        for path in ["rights.description", "rights.icon", "rights.title"] {
            assert!(logs_contain(path), "no event for {path}");
        }
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|l| l.contains("vocabulary field")).count() {
                3 => Ok(()),
                n => Err(format!("expected 3 vocabulary events, got {n}")),
            }
        });
    }

    #[test]
    #[traced_test]
    fn no_events_without_trace() {
        Sanitizer::default().scan(&rights_metadata());
        assert!(!logs_contain("vocabulary field"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// JSON trees biased towards the keys the sanitizer cares about.
    fn metadata_tree() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        ];
        let key = prop_oneof![
            Just("id".to_string()),
            Just("title".to_string()),
            Just("icon".to_string()),
            Just("description".to_string()),
            Just("link".to_string()),
            Just("links".to_string()),
            "[a-z]{1,8}",
        ];
        leaf.prop_recursive(4, 64, 6, move |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec((key.clone(), inner), 0..6).prop_map(|pairs| {
                    Value::Object(pairs.into_iter().collect::<Map<String, Value>>())
                }),
            ]
        })
    }

    fn assert_id_title_rule(value: &Value) {
        match value {
            Value::Object(obj) => {
                assert!(!(obj.contains_key("id") && obj.contains_key("title")));
                for key in VOCABULARY_EXTRA_KEYS {
                    assert!(!obj.contains_key(*key));
                }
                obj.values().for_each(assert_id_title_rule);
            }
            Value::Array(items) => items.iter().for_each(assert_id_title_rule),
            _ => {}
        }
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(value in metadata_tree()) {
            let sanitizer = Sanitizer::default();
            let once = sanitizer.sanitize(&value, None);
            let twice = sanitizer.sanitize(&once, None);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn scan_agrees_with_sanitize(value in metadata_tree()) {
            for rule in [TitleRule::WhenIdPresent, TitleRule::UnlessDescribed] {
                let sanitizer = Sanitizer::new(rule);
                let mut collected = VocabularyReport::new();
                let _ = sanitizer.sanitize(&value, Some(&mut collected));
                let scanned = sanitizer.scan(&value);
                prop_assert_eq!(collected.paths(), scanned.paths());
            }
        }

        #[test]
        fn sanitized_output_has_no_enrichment(value in metadata_tree()) {
            let cleaned = Sanitizer::default().sanitize(&value, None);
            assert_id_title_rule(&cleaned);
        }
    }
}
