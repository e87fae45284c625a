// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::data::bag::FieldBag;
use crate::data::{impl_telemetry_data, Measurements, Properties};

/// Metric type: single measurement or pre-aggregated value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataPointType {
    Measurement = 0,
    Aggregation = 1,
}

impl From<DataPointType> for Value {
    fn from(kind: DataPointType) -> Value {
        Value::from(kind as i64)
    }
}

/// Trace severity, serialized as its numeric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeverityLevel {
    Verbose = 0,
    Information = 1,
    Warning = 2,
    Error = 3,
    Critical = 4,
}

impl From<SeverityLevel> for Value {
    fn from(level: SeverityLevel) -> Value {
        Value::from(level as i64)
    }
}

/// Structured event record, grouped and searched by name and properties.
#[derive(Clone, Debug)]
pub struct EventData {
    time: DateTime<Utc>,
    bag: FieldBag,
    properties: Properties,
}

impl EventData {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("ver", 2);
        bag.put("name", Value::Null);
        Self {
            time: Utc::now(),
            bag,
            properties: Properties::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str("name")
    }

    /// Keep the name low cardinality to allow grouping and useful metrics.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put("name", name.into());
    }

    pub fn measurements(&self) -> Option<&Value> {
        self.bag.get("measurements")
    }

    pub fn set_measurements(&mut self, measurements: Measurements) {
        self.bag.put("measurements", Value::Object(measurements));
    }
}

impl_telemetry_data!(EventData, "Microsoft.ApplicationInsights.Event", "EventData");

/// Printf-like trace statement, text-searched.
#[derive(Clone, Debug)]
pub struct MessageData {
    time: DateTime<Utc>,
    bag: FieldBag,
    properties: Properties,
}

impl MessageData {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("ver", 2);
        bag.put("message", Value::Null);
        Self {
            time: Utc::now(),
            bag,
            properties: Properties::new(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.bag.get_str("message")
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.bag.put("message", message.into());
    }

    pub fn severity_level(&self) -> Option<i64> {
        self.bag.get_i64("severityLevel")
    }

    pub fn set_severity_level(&mut self, level: Option<SeverityLevel>) {
        match level {
            Some(level) => self.bag.put("severityLevel", level),
            None => self.bag.put("severityLevel", Value::Null),
        }
    }

    pub fn measurements(&self) -> Option<&Value> {
        self.bag.get("measurements")
    }

    pub fn set_measurements(&mut self, measurements: Measurements) {
        self.bag.put("measurements", Value::Object(measurements));
    }
}

impl_telemetry_data!(
    MessageData,
    "Microsoft.ApplicationInsights.Message",
    "MessageData"
);

/// Metric data single measurement.
#[derive(Clone, Debug)]
pub struct DataPoint {
    bag: FieldBag,
}

impl Default for DataPoint {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPoint {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("name", Value::Null);
        bag.put("kind", DataPointType::Measurement);
        bag.put("value", Value::Null);
        Self { bag }
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put("name", name.into());
    }

    /// Namespace of the metric.
    pub fn ns(&self) -> Option<&str> {
        self.bag.get_str("ns")
    }

    pub fn set_ns(&mut self, ns: impl Into<String>) {
        self.bag.put("ns", ns.into());
    }

    pub fn kind(&self) -> Option<DataPointType> {
        match self.bag.get_i64("kind") {
            Some(0) => Some(DataPointType::Measurement),
            Some(1) => Some(DataPointType::Aggregation),
            _ => None,
        }
    }

    pub fn set_kind(&mut self, kind: DataPointType) {
        self.bag.put("kind", kind);
    }

    /// Single value for a measurement, sum of values for an aggregation.
    pub fn value(&self) -> Option<f64> {
        self.bag.get_f64("value")
    }

    pub fn set_value(&mut self, value: f64) {
        self.bag.put("value", value);
    }

    /// Metric weight of an aggregation. Not set for a measurement.
    pub fn count(&self) -> Option<u64> {
        self.bag.get("count").and_then(Value::as_u64)
    }

    pub fn set_count(&mut self, count: u64) {
        self.bag.put("count", count);
    }

    pub fn min(&self) -> Option<f64> {
        self.bag.get_f64("min")
    }

    /// A minimum of exactly zero means "no minimum supplied" and is kept
    /// off the wire.
    pub fn set_min(&mut self, min: f64) {
        if min == 0.0 {
            self.bag.put("min", Value::Null);
        } else {
            self.bag.put("min", min);
        }
    }

    pub fn max(&self) -> Option<f64> {
        self.bag.get_f64("max")
    }

    pub fn set_max(&mut self, max: f64) {
        self.bag.put("max", max);
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.bag.get_f64("stdDev")
    }

    pub fn set_std_dev(&mut self, std_dev: f64) {
        self.bag.put("stdDev", std_dev);
    }

    pub fn to_value(&self) -> Value {
        self.bag.to_value()
    }
}

/// A list of measurements and/or aggregations.
///
/// Only the first data point in the list is used by the ingestion store.
#[derive(Clone, Debug)]
pub struct MetricData {
    time: DateTime<Utc>,
    bag: FieldBag,
    properties: Properties,
}

impl MetricData {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("ver", 2);
        bag.put("metrics", Value::Array(Vec::new()));
        Self {
            time: Utc::now(),
            bag,
            properties: Properties::new(),
        }
    }

    pub fn metrics(&self) -> Option<&Value> {
        self.bag.get("metrics")
    }

    pub fn set_metrics(&mut self, metrics: Vec<DataPoint>) {
        let metrics: Vec<Value> = metrics.iter().map(DataPoint::to_value).collect();
        self.bag.put("metrics", Value::Array(metrics));
    }

    pub fn measurements(&self) -> Option<&Value> {
        self.bag.get("measurements")
    }

    pub fn set_measurements(&mut self, measurements: Measurements) {
        self.bag.put("measurements", Value::Object(measurements));
    }
}

impl_telemetry_data!(
    MetricData,
    "Microsoft.ApplicationInsights.Metric",
    "MetricData"
);

/// Stack frame information.
#[derive(Clone, Debug)]
pub struct StackFrame {
    bag: FieldBag,
}

impl Default for StackFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl StackFrame {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("level", Value::Null);
        bag.put("method", Value::Null);
        Self { bag }
    }

    pub fn level(&self) -> Option<&str> {
        self.bag.get_str("level")
    }

    /// Levels are strings on the wire so that `"0"` survives serialization.
    pub fn set_level(&mut self, level: impl Into<String>) {
        self.bag.put("level", level.into());
    }

    pub fn method(&self) -> Option<&str> {
        self.bag.get_str("method")
    }

    pub fn set_method(&mut self, method: impl Into<String>) {
        self.bag.put("method", method.into());
    }

    /// Name of the assembly (dll, jar, crate) containing this function.
    pub fn assembly(&self) -> Option<&str> {
        self.bag.get_str("assembly")
    }

    pub fn set_assembly(&mut self, assembly: impl Into<String>) {
        self.bag.put("assembly", assembly.into());
    }

    pub fn file_name(&self) -> Option<&str> {
        self.bag.get_str("fileName")
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.bag.put("fileName", file_name.into());
    }

    pub fn line(&self) -> Option<i64> {
        self.bag.get_i64("line")
    }

    pub fn set_line(&mut self, line: i64) {
        self.bag.put("line", line);
    }

    pub fn to_value(&self) -> Value {
        self.bag.to_value()
    }
}

/// Details of one exception in a chain.
#[derive(Clone, Debug)]
pub struct ExceptionDetails {
    bag: FieldBag,
}

impl Default for ExceptionDetails {
    fn default() -> Self {
        Self::new()
    }
}

impl ExceptionDetails {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("typeName", Value::Null);
        bag.put("message", Value::Null);
        bag.put("hasFullStack", true);
        Self { bag }
    }

    pub fn id(&self) -> Option<i64> {
        self.bag.get_i64("id")
    }

    pub fn set_id(&mut self, id: i64) {
        self.bag.put("id", id);
    }

    pub fn outer_id(&self) -> Option<i64> {
        self.bag.get_i64("outerId")
    }

    /// `outerId` references the outer exception of this one; zero or
    /// negative means there is none and the key stays absent.
    pub fn set_outer_id(&mut self, outer_id: i64) {
        if outer_id > 0 {
            self.bag.put("outerId", outer_id);
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.bag.get_str("typeName")
    }

    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.bag.put("typeName", type_name.into());
    }

    pub fn message(&self) -> Option<&str> {
        self.bag.get_str("message")
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.bag.put("message", message.into());
    }

    /// False when the stack was trimmed, as with a stack overflow.
    pub fn has_full_stack(&self) -> Option<bool> {
        self.bag.get_bool("hasFullStack")
    }

    pub fn set_has_full_stack(&mut self, has_full_stack: bool) {
        self.bag.put("hasFullStack", has_full_stack);
    }

    /// Text describing the stack. Either stack or parsedStack should have
    /// a value.
    pub fn stack(&self) -> Option<&str> {
        self.bag.get_str("stack")
    }

    pub fn set_stack(&mut self, stack: impl Into<String>) {
        self.bag.put("stack", stack.into());
    }

    pub fn parsed_stack(&self) -> Option<&Value> {
        self.bag.get("parsedStack")
    }

    pub fn set_parsed_stack(&mut self, parsed_stack: Vec<StackFrame>) {
        let frames: Vec<Value> = parsed_stack.iter().map(StackFrame::to_value).collect();
        self.bag.put("parsedStack", Value::Array(frames));
    }

    pub fn to_value(&self) -> Value {
        self.bag.to_value()
    }
}

/// A handled or unhandled exception raised during the monitored
/// application's execution.
#[derive(Clone, Debug)]
pub struct ExceptionData {
    time: DateTime<Utc>,
    bag: FieldBag,
    properties: Properties,
}

impl ExceptionData {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("ver", 2);
        bag.put("exceptions", Value::Array(Vec::new()));
        Self {
            time: Utc::now(),
            bag,
            properties: Properties::new(),
        }
    }

    /// Exception chain, outer to inner.
    pub fn exceptions(&self) -> Option<&Value> {
        self.bag.get("exceptions")
    }

    pub fn set_exceptions(&mut self, exceptions: Vec<ExceptionDetails>) {
        let details: Vec<Value> = exceptions.iter().map(ExceptionDetails::to_value).collect();
        self.bag.put("exceptions", Value::Array(details));
    }

    pub fn severity_level(&self) -> Option<&str> {
        self.bag.get_str("severityLevel")
    }

    pub fn set_severity_level(&mut self, severity_level: impl Into<String>) {
        self.bag.put("severityLevel", severity_level.into());
    }

    /// Where the exception was thrown; used for grouping.
    pub fn problem_id(&self) -> Option<&str> {
        self.bag.get_str("problemId")
    }

    pub fn set_problem_id(&mut self, problem_id: impl Into<String>) {
        self.bag.put("problemId", problem_id.into());
    }

    pub fn measurements(&self) -> Option<&Value> {
        self.bag.get("measurements")
    }

    pub fn set_measurements(&mut self, measurements: Measurements) {
        self.bag.put("measurements", Value::Object(measurements));
    }
}

impl_telemetry_data!(
    ExceptionData,
    "Microsoft.ApplicationInsights.Exception",
    "ExceptionData"
);

/// Completion of an incoming request: execution summary and result.
#[derive(Clone, Debug)]
pub struct RequestData {
    time: DateTime<Utc>,
    bag: FieldBag,
    properties: Properties,
}

impl RequestData {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("ver", 2);
        bag.put("id", Value::Null);
        bag.put("duration", Value::Null);
        bag.put("responseCode", Value::Null);
        bag.put("success", Value::Null);
        Self {
            time: Utc::now(),
            bag,
            properties: Properties::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.bag.get_str("id")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.bag.put("id", id.into());
    }

    /// Duration in the `HH:MM:SS.mmm` timespan encoding.
    pub fn duration(&self) -> Option<&str> {
        self.bag.get_str("duration")
    }

    pub fn set_duration(&mut self, duration: impl Into<String>) {
        self.bag.put("duration", duration.into());
    }

    pub fn response_code(&self) -> Option<i64> {
        self.bag.get_i64("responseCode")
    }

    pub fn set_response_code(&mut self, response_code: i64) {
        self.bag.put("responseCode", response_code);
    }

    pub fn success(&self) -> Option<bool> {
        self.bag.get_bool("success")
    }

    pub fn set_success(&mut self, success: bool) {
        self.bag.put("success", success);
    }

    /// Source of the request, e.g. the caller's instrumentation key or IP.
    pub fn source(&self) -> Option<&str> {
        self.bag.get_str("source")
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.bag.put("source", source.into());
    }

    pub fn url(&self) -> Option<&str> {
        self.bag.get_str("url")
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.bag.put("url", url.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put("name", name.into());
    }

    pub fn measurements(&self) -> Option<&Value> {
        self.bag.get("measurements")
    }

    pub fn set_measurements(&mut self, measurements: Measurements) {
        self.bag.put("measurements", Value::Object(measurements));
    }
}

impl_telemetry_data!(
    RequestData,
    "Microsoft.ApplicationInsights.Request",
    "RequestData"
);

/// An interaction with a remote component, like SQL or an HTTP endpoint.
#[derive(Clone, Debug)]
pub struct RemoteDependencyData {
    time: DateTime<Utc>,
    bag: FieldBag,
    properties: Properties,
}

impl RemoteDependencyData {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("ver", 2);
        bag.put("name", Value::Null);
        bag.put("duration", Value::Null);
        bag.put("success", true);
        Self {
            time: Utc::now(),
            bag,
            properties: Properties::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put("name", name.into());
    }

    /// Correlates with the request telemetry of the containing operation.
    pub fn id(&self) -> Option<&str> {
        self.bag.get_str("id")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.bag.put("id", id.into());
    }

    pub fn result_code(&self) -> Option<&str> {
        self.bag.get_str("resultCode")
    }

    /// Result codes travel as their decimal string representation.
    pub fn set_result_code(&mut self, result_code: i64) {
        self.bag.put("resultCode", result_code.to_string());
    }

    pub fn duration(&self) -> Option<&str> {
        self.bag.get_str("duration")
    }

    pub fn set_duration(&mut self, duration: impl Into<String>) {
        self.bag.put("duration", duration.into());
    }

    pub fn success(&self) -> Option<bool> {
        self.bag.get_bool("success")
    }

    pub fn set_success(&mut self, success: bool) {
        self.bag.put("success", success);
    }

    /// Command initiated by the call, e.g. a SQL statement or full URL.
    pub fn data(&self) -> Option<&str> {
        self.bag.get_str("data")
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        self.bag.put("data", data.into());
    }

    /// Target site of the call, e.g. server name or host address.
    pub fn target(&self) -> Option<&str> {
        self.bag.get_str("target")
    }

    pub fn set_target(&mut self, target: impl Into<String>) {
        self.bag.put("target", target.into());
    }

    /// Low-cardinality grouping name, e.g. SQL or HTTP.
    pub fn dependency_type(&self) -> Option<&str> {
        self.bag.get_str("type")
    }

    pub fn set_dependency_type(&mut self, dependency_type: impl Into<String>) {
        self.bag.put("type", dependency_type.into());
    }

    pub fn measurements(&self) -> Option<&Value> {
        self.bag.get("measurements")
    }

    pub fn set_measurements(&mut self, measurements: Measurements) {
        self.bag.put("measurements", Value::Object(measurements));
    }
}

impl_telemetry_data!(
    RemoteDependencyData,
    "Microsoft.ApplicationInsights.RemoteDependency",
    "RemoteDependencyData"
);

/// A viewed page or a generic action on one.
#[derive(Clone, Debug)]
pub struct PageViewData {
    time: DateTime<Utc>,
    bag: FieldBag,
    properties: Properties,
}

impl PageViewData {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("ver", 2);
        bag.put("name", Value::Null);
        Self {
            time: Utc::now(),
            bag,
            properties: Properties::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put("name", name.into());
    }

    pub fn url(&self) -> Option<&str> {
        self.bag.get_str("url")
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.bag.put("url", url.into());
    }

    pub fn duration(&self) -> Option<&str> {
        self.bag.get_str("duration")
    }

    pub fn set_duration(&mut self, duration: impl Into<String>) {
        self.bag.put("duration", duration.into());
    }

    pub fn id(&self) -> Option<&str> {
        self.bag.get_str("id")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.bag.put("id", id.into());
    }

    pub fn referrer_uri(&self) -> Option<&str> {
        self.bag.get_str("referrerUri")
    }

    pub fn set_referrer_uri(&mut self, referrer_uri: impl Into<String>) {
        self.bag.put("referrerUri", referrer_uri.into());
    }

    pub fn measurements(&self) -> Option<&Value> {
        self.bag.get("measurements")
    }

    pub fn set_measurements(&mut self, measurements: Measurements) {
        self.bag.put("measurements", Value::Object(measurements));
    }
}

impl_telemetry_data!(
    PageViewData,
    "Microsoft.ApplicationInsights.PageView",
    "PageViewData"
);

/// A page view with client-side performance timings attached.
#[derive(Clone, Debug)]
pub struct PageViewPerfData {
    time: DateTime<Utc>,
    bag: FieldBag,
    properties: Properties,
}

impl PageViewPerfData {
    pub fn new() -> Self {
        let mut bag = FieldBag::new();
        bag.put("ver", 2);
        bag.put("name", Value::Null);
        Self {
            time: Utc::now(),
            bag,
            properties: Properties::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.bag.get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.bag.put("name", name.into());
    }

    pub fn url(&self) -> Option<&str> {
        self.bag.get_str("url")
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.bag.put("url", url.into());
    }

    pub fn duration(&self) -> Option<&str> {
        self.bag.get_str("duration")
    }

    pub fn set_duration(&mut self, duration: impl Into<String>) {
        self.bag.put("duration", duration.into());
    }

    pub fn id(&self) -> Option<&str> {
        self.bag.get_str("id")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.bag.put("id", id.into());
    }

    pub fn referrer_uri(&self) -> Option<&str> {
        self.bag.get_str("referrerUri")
    }

    pub fn set_referrer_uri(&mut self, referrer_uri: impl Into<String>) {
        self.bag.put("referrerUri", referrer_uri.into());
    }

    pub fn perf_total(&self) -> Option<&str> {
        self.bag.get_str("perfTotal")
    }

    pub fn set_perf_total(&mut self, perf_total: impl Into<String>) {
        self.bag.put("perfTotal", perf_total.into());
    }

    pub fn network_connect(&self) -> Option<&str> {
        self.bag.get_str("networkConnect")
    }

    pub fn set_network_connect(&mut self, network_connect: impl Into<String>) {
        self.bag.put("networkConnect", network_connect.into());
    }

    pub fn sent_request(&self) -> Option<&str> {
        self.bag.get_str("sentRequest")
    }

    pub fn set_sent_request(&mut self, sent_request: impl Into<String>) {
        self.bag.put("sentRequest", sent_request.into());
    }

    pub fn received_response(&self) -> Option<&str> {
        self.bag.get_str("receivedResponse")
    }

    pub fn set_received_response(&mut self, received_response: impl Into<String>) {
        self.bag.put("receivedResponse", received_response.into());
    }

    pub fn dom_processing(&self) -> Option<&str> {
        self.bag.get_str("domProcessing")
    }

    pub fn set_dom_processing(&mut self, dom_processing: impl Into<String>) {
        self.bag.put("domProcessing", dom_processing.into());
    }

    pub fn measurements(&self) -> Option<&Value> {
        self.bag.get("measurements")
    }

    pub fn set_measurements(&mut self, measurements: Measurements) {
        self.bag.put("measurements", Value::Object(measurements));
    }
}

impl_telemetry_data!(
    PageViewPerfData,
    "Microsoft.ApplicationInsights.PageViewPerf",
    "PageViewPerfData"
);
