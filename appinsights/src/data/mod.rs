// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

//! Wire contracts for the track endpoint.
//!
//! Every entity is a typed field bag: schema keys seeded with their default
//! values at construction, typed accessors on top, and a serialized view
//! that omits null and empty values.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

pub mod bag;
mod envelope;
mod payloads;
mod tags;

pub use envelope::{Data, Envelope};
pub use payloads::{
    DataPoint, DataPointType, EventData, ExceptionData, ExceptionDetails, MessageData, MetricData,
    PageViewData, PageViewPerfData, RemoteDependencyData, RequestData, SeverityLevel, StackFrame,
};
pub use tags::{Application, Cloud, Device, Internal, Location, Operation, Session, User};

/// Free-form name/value pairs attached to a telemetry item.
pub type Properties = serde_json::Map<String, Value>;

/// Named double measurements attached to a telemetry item.
pub type Measurements = serde_json::Map<String, Value>;

/// Wall-clock timestamps on the wire: RFC3339 with milliseconds, UTC `Z`.
pub(crate) fn format_datetime(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One trackable telemetry kind.
///
/// The envelope type name routes the item, the base type names the payload
/// schema, and the creation time becomes the envelope time unless the
/// caller supplies an explicit start time.
pub trait TelemetryData {
    fn envelope_type_name(&self) -> &'static str;

    fn base_type(&self) -> &'static str;

    fn time(&self) -> DateTime<Utc>;

    fn set_time(&mut self, time: DateTime<Utc>);

    fn properties(&self) -> &Properties;

    fn properties_mut(&mut self) -> &mut Properties;

    /// Serialized payload: the pruned field bag plus a `properties` key
    /// when any are attached.
    fn to_value(&self) -> Value;
}

macro_rules! impl_telemetry_data {
    ($type:ty, $envelope_name:literal, $base_type:literal) => {
        impl crate::data::TelemetryData for $type {
            fn envelope_type_name(&self) -> &'static str {
                $envelope_name
            }

            fn base_type(&self) -> &'static str {
                $base_type
            }

            fn time(&self) -> chrono::DateTime<chrono::Utc> {
                self.time
            }

            fn set_time(&mut self, time: chrono::DateTime<chrono::Utc>) {
                self.time = time;
            }

            fn properties(&self) -> &crate::data::Properties {
                &self.properties
            }

            fn properties_mut(&mut self) -> &mut crate::data::Properties {
                &mut self.properties
            }

            fn to_value(&self) -> serde_json::Value {
                self.bag.to_value_with_properties(&self.properties)
            }
        }

        impl serde::Serialize for $type {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&crate::data::TelemetryData::to_value(self), serializer)
            }
        }

        impl Default for $type {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

pub(crate) use impl_telemetry_data;
