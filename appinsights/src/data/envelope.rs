// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::data::bag::FieldBag;
use crate::data::format_datetime;

/// Top-level wire record wrapping one telemetry item.
///
/// The time field is the wall clock on the client when the item was
/// created; there is no guarantee that the client's clock is accurate.
#[derive(Clone, Debug)]
pub struct Envelope {
    bag: FieldBag,
}

impl Envelope {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("ver", 1);
        bag.put("name", Value::Null);
        bag.put("time", Value::Null);
        bag.put("sampleRate", 100.0);
        Self { bag }
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put("name", name.into());
    }

    pub fn time(&self) -> Option<&str> {
        self.bag.get_str("time")
    }

    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.bag.put("time", format_datetime(time));
    }

    /// This item stands for `1 / sampleRate` actual items.
    pub fn sample_rate(&self) -> Option<f64> {
        self.bag.get_f64("sampleRate")
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.bag.put("sampleRate", sample_rate);
    }

    /// Tracks the absolute order of uploaded items.
    pub fn seq(&self) -> Option<&str> {
        self.bag.get_str("seq")
    }

    pub fn set_seq(&mut self, seq: impl Into<String>) {
        self.bag.put("seq", seq.into());
    }

    /// The application's instrumentation key. Typically a GUID, but nothing
    /// relies on that shape.
    pub fn instrumentation_key(&self) -> Option<&str> {
        self.bag.get_str("iKey")
    }

    pub fn set_instrumentation_key(&mut self, key: impl Into<String>) {
        self.bag.put("iKey", key.into());
    }

    pub fn tags(&self) -> Option<&Map<String, Value>> {
        self.bag.get("tags").and_then(Value::as_object)
    }

    pub fn set_tags(&mut self, tags: Map<String, Value>) {
        self.bag.put("tags", Value::Object(tags));
    }

    pub fn data(&self) -> Option<&Value> {
        self.bag.get("data")
    }

    pub fn set_data(&mut self, data: Data) {
        self.bag.put("data", data.to_value());
    }

    pub fn to_value(&self) -> Value {
        self.bag.to_value()
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Wrapper pairing a payload with the name of its schema.
#[derive(Clone, Debug, Default)]
pub struct Data {
    bag: FieldBag,
}

impl Data {
    pub fn new() -> Self {
        Self {
            bag: FieldBag::new(),
        }
    }

    pub fn base_type(&self) -> Option<&str> {
        self.bag.get_str("baseType")
    }

    pub fn set_base_type(&mut self, base_type: impl Into<String>) {
        self.bag.put("baseType", base_type.into());
    }

    pub fn base_data(&self) -> Option<&Value> {
        self.bag.get("baseData")
    }

    pub fn set_base_data(&mut self, base_data: Value) {
        self.bag.put("baseData", base_data);
    }

    pub fn to_value(&self) -> Value {
        self.bag.to_value()
    }
}
