// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Extracted record type

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One extracted result: named fields in the order they were specified
///
/// A field's value is `None` when its selector matched nothing and the
/// field was not required; absence is explicit rather than fatal, so the
/// caller decides what it means.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; order is preserved
    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.fields.push((name.into(), value));
    }

    /// Get a field's value; `None` for absent values and unknown names
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Check whether a field with this name exists, present or absent
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Iterate fields in specification order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Field count
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record holds no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Serialized as a plain JSON object, field order preserved.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_order_and_access() {
        let mut record = Record::new();
        record.push("name", Some("A Light in the Attic".to_string()));
        record.push("price", Some("£51.77".to_string()));
        record.push("rating", None);

        assert_eq!(record.len(), 3);
        assert_eq!(record.get("name"), Some("A Light in the Attic"));
        assert_eq!(record.get("rating"), None);
        assert!(record.has_field("rating"));
        assert!(!record.has_field("stock"));

        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "price", "rating"]);
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = Record::new();
        record.push("name", Some("x".to_string()));
        record.push("price", None);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"name":"x","price":null}"#);
    }
}
