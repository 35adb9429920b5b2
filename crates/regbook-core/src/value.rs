//! # Field Values
//!
//! `FieldValue` is the tagged representation of one spreadsheet cell after
//! it has been read, plus the handful of list-shaped values the pipeline
//! synthesizes during normalization.
//!
//! ## Serialization
//!
//! `Empty` serializes as the empty string, never as `null`: downstream
//! consumers see exactly what an unfilled cell looked like in the sheet.
//! Floats with no fractional part are expected to arrive as `Integer`
//! (readers normalize them), so `Number` only carries genuine fractions.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

/// A single field value of a register record.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    /// Blank cell.
    #[default]
    Empty,
    /// Text cell.
    Text(String),
    /// Integral number.
    Integer(i64),
    /// Number with a fractional part.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
    /// Normalized list (e.g. `Related Requirement ID(s)`).
    List(Vec<FieldValue>),
    /// Structured value synthesized by the pipeline.
    Json(Value),
}

impl FieldValue {
    /// Build a text value, mapping the empty string to [`FieldValue::Empty`].
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }

    /// Build a numeric value, collapsing integral floats to [`FieldValue::Integer`].
    pub fn number(f: f64) -> Self {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Self::Integer(f as i64)
        } else {
            Self::Number(f)
        }
    }

    /// Returns true for a blank cell or empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Render the value as a map key or file stem.
    ///
    /// Scalars render the way they would be typed into the sheet; lists and
    /// structured values render as compact JSON.
    pub fn key_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Number(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::List(_) | Self::Json(_) => self.to_json().to_string(),
        }
    }

    /// Convert to a `serde_json::Value` for schema validation.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Empty => Value::String(String::new()),
            Self::Text(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Number(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Bool(b) => Value::Bool(*b),
            Self::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            Self::Json(v) => v.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_str(""),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Number(f) => serializer.serialize_f64(*f),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Json(v) => v.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_text_collapses_to_empty() {
        assert_eq!(FieldValue::text(""), FieldValue::Empty);
        assert_eq!(FieldValue::from("x"), FieldValue::Text("x".to_string()));
    }

    #[test]
    fn integral_floats_become_integers() {
        assert_eq!(FieldValue::number(3.0), FieldValue::Integer(3));
        assert_eq!(FieldValue::number(-7.0), FieldValue::Integer(-7));
        assert_eq!(FieldValue::number(2.5), FieldValue::Number(2.5));
        assert!(matches!(FieldValue::number(f64::NAN), FieldValue::Number(_)));
    }

    #[test]
    fn emptiness() {
        assert!(FieldValue::Empty.is_empty());
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(!FieldValue::Integer(0).is_empty());
        assert!(!FieldValue::List(vec![]).is_empty());
    }

    #[test]
    fn key_strings() {
        assert_eq!(FieldValue::Text("High".into()).key_string(), "High");
        assert_eq!(FieldValue::Integer(42).key_string(), "42");
        assert_eq!(FieldValue::Number(1.5).key_string(), "1.5");
        assert_eq!(FieldValue::Bool(true).key_string(), "true");
        assert_eq!(FieldValue::Empty.key_string(), "");
    }

    #[test]
    fn serializes_like_to_json() {
        let v = FieldValue::List(vec![
            FieldValue::Empty,
            FieldValue::Text("R1".into()),
            FieldValue::Integer(2),
            FieldValue::Json(json!({"a": 1})),
        ]);
        assert_eq!(serde_json::to_value(&v).unwrap(), v.to_json());
        assert_eq!(v.to_json(), json!(["", "R1", 2, {"a": 1}]));
    }
}
