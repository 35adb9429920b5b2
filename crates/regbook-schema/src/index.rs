//! # Index Annotations
//!
//! A requirement schema marks a property as indexable with a custom
//! `index` object:
//!
//! ```json
//! "Category": {
//!   "type": "string",
//!   "enum": ["Governance", "Technical"],
//!   "index": {"id": "by-category", "title": "By Category", "type": "group", "order": 1}
//! }
//! ```
//!
//! `id` is mandatory and names the output file (`indexes/<id>.json`);
//! `title`, `type`, and `order` are optional and are copied verbatim into
//! the index's `_meta` and the discovery manifest.

use serde_json::{Map, Value};

use crate::validate::{RecordSchema, SchemaError};

/// Property keyword carrying the index annotation.
pub const INDEX_ANNOTATION: &str = "index";

/// Ids whose files under `indexes/` are written by the generator itself.
pub const RESERVED_INDEX_IDS: [&str; 2] = ["index", "evidences-by-requirement"];

/// One indexable field of the requirement schema.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    /// Property name in the schema (and column name in the sheet).
    pub field: String,
    /// Index identifier from the annotation.
    pub id: String,
    /// The raw annotation object, in document order.
    pub annotation: Map<String, Value>,
    /// Values the field may legally take (`enum` / `oneOf` consts).
    pub legal_values: Vec<Value>,
}

impl IndexSpec {
    /// Optional display title.
    pub fn title(&self) -> Option<&str> {
        self.annotation.get("title").and_then(Value::as_str)
    }

    /// Optional index type.
    pub fn kind(&self) -> Option<&str> {
        self.annotation.get("type").and_then(Value::as_str)
    }

    /// Optional sort order for the discovery manifest.
    pub fn order(&self) -> Option<f64> {
        self.annotation.get("order").and_then(Value::as_f64)
    }

    /// Output file name under `indexes/`.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.id)
    }

    /// Returns true if `observed` is one of the legal values, or if the
    /// field declares none.
    pub fn allows(&self, observed: &str) -> bool {
        self.legal_values.is_empty()
            || self.legal_values.iter().any(|v| match v {
                Value::String(s) => s == observed,
                other => other.to_string() == observed,
            })
    }
}

/// Extract every indexable property of `schema`, in property order.
///
/// # Errors
///
/// Returns `SchemaError::InvalidIndexAnnotation` if an annotation is not
/// an object, lacks a non-empty string `id`, reuses another index's `id`
/// or a reserved one, or has an `id` that is not usable as a file name.
pub fn index_specs(schema: &RecordSchema) -> Result<Vec<IndexSpec>, SchemaError> {
    let mut specs: Vec<IndexSpec> = Vec::new();

    for (field, property) in schema.properties() {
        let Some(annotation) = property.get(INDEX_ANNOTATION) else {
            continue;
        };
        let invalid = |reason: &str| SchemaError::InvalidIndexAnnotation {
            schema_name: schema.name().to_string(),
            field: field.clone(),
            reason: reason.to_string(),
        };

        let annotation = annotation
            .as_object()
            .ok_or_else(|| invalid("annotation must be an object"))?;
        let id = annotation
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid("annotation requires a non-empty string 'id'"))?;
        if id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(invalid("'id' must be usable as a file name"));
        }
        if RESERVED_INDEX_IDS.contains(&id) {
            return Err(invalid("'id' is reserved"));
        }
        if specs.iter().any(|s| s.id == id) {
            return Err(invalid("'id' is already used by another index"));
        }

        specs.push(IndexSpec {
            id: id.to_string(),
            legal_values: legal_values(&property),
            annotation: annotation.clone(),
            field,
        });
    }

    Ok(specs)
}

/// Legal values of a property: its `enum` list, or the `const` of every
/// `oneOf` alternative. Empty when the property has neither shape.
pub fn legal_values(property: &Value) -> Vec<Value> {
    if let Some(values) = property.get("enum").and_then(Value::as_array) {
        return values.clone();
    }
    if let Some(alternatives) = property.get("oneOf").and_then(Value::as_array) {
        return alternatives
            .iter()
            .filter_map(|alt| alt.get("const").cloned())
            .collect();
    }
    Vec::new()
}
