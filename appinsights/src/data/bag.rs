// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

use serde_json::{Map, Value};

/// Insertion-ordered storage backing every contract entity.
///
/// Keys are fixed schema strings. Serialization drops keys holding JSON
/// `null` or an empty collection; `0`, `false` and `""` are kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldBag {
    entries: Map<String, Value>,
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl FieldBag {
    pub fn new() -> Self {
        Self {
            entries: Map::new(),
        }
    }

    pub fn put(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(key.to_owned(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.entries.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.entries.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.entries.get(key).and_then(Value::as_bool)
    }

    /// The serialized view of the bag with null and empty values removed.
    ///
    /// Nested values are pruned at insertion time, so one pass over the top
    /// level is enough.
    pub fn to_pruned(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .filter(|(_, value)| !is_empty_value(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_pruned())
    }

    /// Like [`FieldBag::to_value`], appending a `properties` key when the
    /// given map is non-empty.
    pub fn to_value_with_properties(&self, properties: &Map<String, Value>) -> Value {
        let mut pruned = self.to_pruned();
        if !properties.is_empty() {
            pruned.insert("properties".to_owned(), Value::Object(properties.clone()));
        }
        Value::Object(pruned)
    }
}
