//! # Register Records
//!
//! A `Record` is an ordered field-name → [`FieldValue`] mapping. Field
//! order is significant: it is the order in which the record is written to
//! disk, so re-running over unchanged input yields byte-identical files.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::value::FieldValue;

/// An ordered set of named fields for one requirement or evidence row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Returns true if the record carries `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a field. An existing field keeps its position; a new one is
    /// appended.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Replace an existing field in place using `f`. Does nothing if the
    /// field is absent.
    pub fn update<E>(
        &mut self,
        name: &str,
        f: impl FnOnce(&FieldValue) -> Result<FieldValue, E>,
    ) -> Result<(), E> {
        if let Some((_, slot)) = self.fields.iter_mut().find(|(k, _)| k == name) {
            *slot = f(slot)?;
        }
        Ok(())
    }

    /// Field value or `Empty` when absent.
    pub fn value_or_empty(&self, name: &str) -> FieldValue {
        self.get(name).cloned().unwrap_or_default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert to a JSON object, preserving field order.
    pub fn to_json(&self) -> Value {
        let mut map = Map::with_capacity(self.fields.len());
        for (k, v) in &self.fields {
            map.insert(k.clone(), v.to_json());
        }
        Value::Object(map)
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let mut r = Record::new();
        r.set("Requirement ID", FieldValue::from("R1"));
        r.set("Title", FieldValue::from("Access control"));
        r.set("Priority", FieldValue::Empty);
        r
    }

    #[test]
    fn set_preserves_position_of_existing_field() {
        let mut r = sample();
        r.set("Requirement ID", FieldValue::from("R2"));
        let names: Vec<&str> = r.field_names().collect();
        assert_eq!(names, ["Requirement ID", "Title", "Priority"]);
        assert_eq!(r.get("Requirement ID"), Some(&FieldValue::from("R2")));
    }

    #[test]
    fn set_appends_new_field() {
        let mut r = sample();
        r.set("Framework Mappings", FieldValue::List(vec![]));
        assert_eq!(r.field_names().last(), Some("Framework Mappings"));
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn update_only_touches_present_fields() {
        let mut r = sample();
        r.update::<()>("Priority", |_| Ok(FieldValue::Integer(0))).unwrap();
        r.update::<()>("Missing", |_| Ok(FieldValue::Integer(9))).unwrap();
        assert_eq!(r.get("Priority"), Some(&FieldValue::Integer(0)));
        assert!(!r.contains("Missing"));
    }

    #[test]
    fn update_propagates_errors() {
        let mut r = sample();
        let err = r.update("Title", |_| Err("boom")).unwrap_err();
        assert_eq!(err, "boom");
        assert_eq!(r.get("Title"), Some(&FieldValue::from("Access control")));
    }

    #[test]
    fn serialization_keeps_field_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"Requirement ID":"R1","Title":"Access control","Priority":""}"#
        );
        assert_eq!(serde_json::to_value(sample()).unwrap(), sample().to_json());
    }

    #[test]
    fn value_or_empty_defaults() {
        let r = sample();
        assert_eq!(r.value_or_empty("Nope"), FieldValue::Empty);
        assert_eq!(r.value_or_empty("Title"), FieldValue::from("Access control"));
    }
}
