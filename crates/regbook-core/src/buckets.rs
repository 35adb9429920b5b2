//! # Ordered Buckets
//!
//! A string-keyed multimap that remembers both the order in which keys
//! were first seen and the order in which items were pushed into each
//! bucket. Index files and the evidence reverse index are built with it,
//! so their JSON output follows source row order.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered `key → Vec<T>` map.
#[derive(Debug, Clone)]
pub struct OrderedBuckets<T> {
    positions: HashMap<String, usize>,
    buckets: Vec<(String, Vec<T>)>,
}

impl<T> Default for OrderedBuckets<T> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
            buckets: Vec::new(),
        }
    }
}

impl<T> OrderedBuckets<T> {
    /// Create an empty multimap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` to the bucket for `key`, creating the bucket if needed.
    pub fn push(&mut self, key: impl Into<String>, item: T) {
        let key = key.into();
        match self.positions.get(&key) {
            Some(&idx) => self.buckets[idx].1.push(item),
            None => {
                self.positions.insert(key.clone(), self.buckets.len());
                self.buckets.push((key, vec![item]));
            }
        }
    }

    /// Items in the bucket for `key`; empty when the key was never seen.
    pub fn get(&self, key: &str) -> &[T] {
        self.positions
            .get(key)
            .map(|&idx| self.buckets[idx].1.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if `key` has a bucket.
    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(k, _)| k.as_str())
    }

    /// Buckets in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if no item has been pushed.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<T: Serialize> Serialize for OrderedBuckets<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (k, v) in &self.buckets {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keys_keep_first_seen_order() {
        let mut b = OrderedBuckets::new();
        b.push("High", 1);
        b.push("Low", 2);
        b.push("High", 3);
        assert_eq!(b.keys().collect::<Vec<_>>(), ["High", "Low"]);
        assert_eq!(b.get("High"), &[1, 3]);
        assert_eq!(b.get("Medium"), &[] as &[i32]);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let mut b = OrderedBuckets::new();
        b.push("z", "a");
        b.push("a", "b");
        b.push("z", "c");
        assert_eq!(
            serde_json::to_string(&b).unwrap(),
            r#"{"z":["a","c"],"a":["b"]}"#
        );
    }

    #[test]
    fn empty_serializes_as_empty_object() {
        let b: OrderedBuckets<u8> = OrderedBuckets::new();
        assert!(b.is_empty());
        assert_eq!(serde_json::to_string(&b).unwrap(), "{}");
    }

    proptest! {
        #[test]
        fn bucket_contents_follow_push_order(
            pushes in proptest::collection::vec((0u8..5, any::<u32>()), 0..64)
        ) {
            let mut b = OrderedBuckets::new();
            for (k, v) in &pushes {
                b.push(k.to_string(), *v);
            }
            for key in b.keys() {
                let expected: Vec<u32> = pushes
                    .iter()
                    .filter(|(k, _)| k.to_string() == key)
                    .map(|(_, v)| *v)
                    .collect();
                prop_assert_eq!(b.get(key), expected.as_slice());
            }
            let total: usize = b.iter().map(|(_, v)| v.len()).sum();
            prop_assert_eq!(total, pushes.len());
        }
    }
}
