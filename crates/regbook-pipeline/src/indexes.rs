//! # Custom Indexes and the Discovery Manifest
//!
//! Each indexable requirement field becomes an index keyed by the values
//! observed in that column. Keys appear in first-seen order; each bucket
//! lists requirement summaries in row order.
//!
//! `indexes/index.json` catalogs every index, including the fixed
//! evidences-by-requirement entry, sorted ascending by `order`. Entries
//! without an order come after every entry that has one and otherwise
//! keep their relative position.

use std::cmp::Ordering;

use regbook_core::{FieldValue, OrderedBuckets, RequirementSummary};
use regbook_schema::IndexSpec;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::evidence::EVIDENCES_BY_REQUIREMENT_FILE;

/// Identifier of the reverse evidence index.
pub const EVIDENCES_BY_REQUIREMENT_ID: &str = "evidences-by-requirement";
/// Manifest order of the reverse evidence index.
pub const EVIDENCES_BY_REQUIREMENT_ORDER: i64 = 99;

/// One custom index being accumulated.
#[derive(Debug, Clone)]
pub struct CustomIndex {
    pub spec: IndexSpec,
    pub data: OrderedBuckets<RequirementSummary>,
}

/// Serialized form of `indexes/<id>.json`.
#[derive(Serialize)]
pub(crate) struct IndexFile<'a> {
    #[serde(rename = "_meta")]
    pub meta: &'a Map<String, Value>,
    pub data: &'a OrderedBuckets<RequirementSummary>,
}

/// Serialized form of `indexes/index.json`.
#[derive(Serialize)]
pub(crate) struct ManifestFile<'a> {
    pub indexes: &'a [Map<String, Value>],
}

impl CustomIndex {
    pub fn new(spec: IndexSpec) -> Self {
        Self {
            spec,
            data: OrderedBuckets::new(),
        }
    }

    /// Record that the requirement summarized by `summary` has `value` in
    /// this index's field. Blank values are not indexed.
    pub fn observe(&mut self, value: &FieldValue, summary: &RequirementSummary) {
        if value.is_empty() {
            return;
        }
        let key = value.key_string();
        if !self.spec.allows(&key) {
            tracing::warn!(
                index = %self.spec.id,
                field = %self.spec.field,
                value = %key,
                requirement = %summary.requirement_id,
                "value is not among the field's declared values"
            );
        }
        self.data.push(key, summary.clone());
    }

    pub(crate) fn file(&self) -> IndexFile<'_> {
        IndexFile {
            meta: &self.spec.annotation,
            data: &self.data,
        }
    }
}

/// The fixed manifest entry for `indexes/evidences-by-requirement.json`.
pub fn evidences_by_requirement_entry() -> Map<String, Value> {
    let mut entry = Map::new();
    entry.insert("id".into(), EVIDENCES_BY_REQUIREMENT_ID.into());
    entry.insert("title".into(), "Evidences by Requirement".into());
    entry.insert("type".into(), "evidence".into());
    entry.insert("file".into(), EVIDENCES_BY_REQUIREMENT_FILE.into());
    entry.insert("order".into(), EVIDENCES_BY_REQUIREMENT_ORDER.into());
    entry
}

/// Build the sorted discovery manifest for `specs`.
pub fn discovery_manifest<'a>(
    specs: impl IntoIterator<Item = &'a IndexSpec>,
) -> Vec<Map<String, Value>> {
    let mut entries: Vec<Map<String, Value>> = specs
        .into_iter()
        .map(|spec| {
            let mut entry = spec.annotation.clone();
            entry.insert("file".into(), spec.file_name().into());
            entry
        })
        .collect();
    entries.push(evidences_by_requirement_entry());

    // sort_by is stable, so equal orders keep insertion order.
    entries.sort_by(compare_order);
    entries
}

/// Ascending by `order`; a missing or non-numeric order sorts last.
fn compare_order(a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
    let order = |entry: &Map<String, Value>| entry.get("order").and_then(Value::as_f64);
    match (order(a), order(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
