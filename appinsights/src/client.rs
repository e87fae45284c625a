// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

use backtrace::Backtrace;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::channel::TelemetryChannel;
use crate::config::Config;
use crate::context::TelemetryContext;
use crate::data::{
    DataPoint, DataPointType, EventData, ExceptionData, ExceptionDetails, Measurements,
    MessageData, MetricData, PageViewData, Properties, RemoteDependencyData, RequestData,
    SeverityLevel, StackFrame, TelemetryData,
};
use crate::timespan;
use crate::transport::{HttpResponse, ReqwestSender, TransportError};

/// The main object used for interacting with the ingestion service.
///
/// Each `track_*` method builds the matching data contract, fills the
/// stated defaults, and hands the item to the channel. Nothing leaves the
/// process until [`TelemetryClient::flush`].
pub struct TelemetryClient {
    context: TelemetryContext,
    channel: TelemetryChannel,
}

impl TelemetryClient {
    /// A client with a default context and a reqwest-backed channel
    /// pointed at the standard track endpoint.
    pub fn new(instrumentation_key: impl Into<String>) -> Self {
        Self::with_parts(
            TelemetryContext::new(instrumentation_key),
            TelemetryChannel::new(Box::new(ReqwestSender::new())),
        )
    }

    pub fn from_config(config: Config) -> Self {
        let context = TelemetryContext::new(config.instrumentation_key.unwrap_or_default());
        let mut channel =
            TelemetryChannel::with_endpoint(Box::new(ReqwestSender::new()), config.endpoint_url);
        channel.set_send_gzipped(config.send_gzipped);
        Self::with_parts(context, channel)
    }

    pub fn with_parts(context: TelemetryContext, channel: TelemetryChannel) -> Self {
        Self { context, channel }
    }

    pub fn context(&self) -> &TelemetryContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut TelemetryContext {
        &mut self.context
    }

    pub fn channel(&self) -> &TelemetryChannel {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut TelemetryChannel {
        &mut self.channel
    }

    /// Sends a structured event record.
    pub fn track_event(
        &mut self,
        name: &str,
        properties: Option<Properties>,
        measurements: Option<Measurements>,
    ) {
        let mut data = EventData::new();
        data.set_name(name);
        if let Some(properties) = properties {
            *data.properties_mut() = properties;
        }
        if let Some(measurements) = measurements {
            data.set_measurements(measurements);
        }

        self.channel.add_to_queue(data, &self.context, None);
    }

    /// Sends a trace message.
    pub fn track_message(
        &mut self,
        message: &str,
        severity_level: Option<SeverityLevel>,
        properties: Option<Properties>,
    ) {
        let mut data = MessageData::new();
        data.set_message(message);
        data.set_severity_level(severity_level);
        if let Some(properties) = properties {
            *data.properties_mut() = properties;
        }

        self.channel.add_to_queue(data, &self.context, None);
    }

    /// Sends a single metric data point.
    ///
    /// Absent aggregate fields take the reference defaults: kind
    /// Aggregation, count 0, min 0 (and a zero minimum stays off the
    /// wire), max 0, standard deviation 0.
    #[allow(clippy::too_many_arguments)]
    pub fn track_metric(
        &mut self,
        name: &str,
        value: f64,
        kind: Option<DataPointType>,
        count: Option<u64>,
        min: Option<f64>,
        max: Option<f64>,
        std_dev: Option<f64>,
        properties: Option<Properties>,
    ) {
        let mut point = DataPoint::new();
        point.set_name(name);
        point.set_value(value);
        point.set_kind(kind.unwrap_or(DataPointType::Aggregation));
        point.set_count(count.unwrap_or(0));
        point.set_min(min.unwrap_or(0.0));
        point.set_max(max.unwrap_or(0.0));
        point.set_std_dev(std_dev.unwrap_or(0.0));

        let mut data = MetricData::new();
        data.set_metrics(vec![point]);
        if let Some(properties) = properties {
            *data.properties_mut() = properties;
        }

        self.channel.add_to_queue(data, &self.context, None);
    }

    /// Sends a completed request in one call. Equivalent to
    /// [`TelemetryClient::begin_request`] followed by
    /// [`TelemetryClient::end_request`].
    #[allow(clippy::too_many_arguments)]
    pub fn track_request(
        &mut self,
        name: &str,
        url: &str,
        start_time: DateTime<Utc>,
        duration_ms: i64,
        response_code: i64,
        success: bool,
        properties: Option<Properties>,
        measurements: Option<Measurements>,
    ) {
        let request = self.begin_request(name, url, Some(start_time));
        self.end_request(
            request,
            duration_ms,
            response_code,
            success,
            properties,
            measurements,
        );
    }

    /// Starts timing a request. Mints a fresh id and captures the start
    /// time without queueing anything.
    pub fn begin_request(
        &self,
        name: &str,
        url: &str,
        start_time: Option<DateTime<Utc>>,
    ) -> RequestData {
        let mut data = RequestData::new();
        data.set_id(Uuid::new_v4().to_string());
        data.set_name(name);
        data.set_url(url);
        data.set_time(start_time.unwrap_or_else(Utc::now));
        data
    }

    /// Completes a request started with [`TelemetryClient::begin_request`]
    /// and queues it.
    pub fn end_request(
        &mut self,
        mut request: RequestData,
        duration_ms: i64,
        response_code: i64,
        success: bool,
        properties: Option<Properties>,
        measurements: Option<Measurements>,
    ) {
        request.set_response_code(response_code);
        request.set_success(success);
        request.set_duration(timespan::format_ms(duration_ms));
        if let Some(properties) = properties {
            *request.properties_mut() = properties;
        }
        if let Some(measurements) = measurements {
            request.set_measurements(measurements);
        }

        self.channel.add_to_queue(request, &self.context, None);
    }

    /// Sends a caught error with its captured call stack.
    pub fn track_exception<E>(
        &mut self,
        error: &E,
        properties: Option<Properties>,
        measurements: Option<Measurements>,
    ) where
        E: std::error::Error + ?Sized,
    {
        let frames = resolved_frames(&Backtrace::new());

        let mut details = ExceptionDetails::new();
        details.set_id(1);
        details.set_outer_id(0);
        details.set_type_name(std::any::type_name::<E>());
        details.set_message(match frames.iter().find(|frame| frame.file.is_some()) {
            Some(frame) => format!(
                "{error} in {} on line {}",
                frame.file.as_deref().unwrap_or_default(),
                frame.line.unwrap_or(0),
            ),
            None => error.to_string(),
        });
        details.set_has_full_stack(true);

        // Innermost frame first in the capture. The wire format lists
        // frames outermost first and numbers the innermost one "0", so
        // count up while prepending.
        let mut parsed_stack: Vec<StackFrame> = Vec::with_capacity(frames.len());
        for (level, frame) in frames.iter().enumerate() {
            let mut stack_frame = StackFrame::new();
            stack_frame.set_method(frame.method.clone());
            if let Some(file) = &frame.file {
                stack_frame.set_file_name(file.clone());
            }
            if let Some(line) = frame.line {
                stack_frame.set_line(line);
            }
            stack_frame.set_level(level.to_string());
            parsed_stack.insert(0, stack_frame);
        }
        details.set_parsed_stack(parsed_stack);

        let mut data = ExceptionData::new();
        data.set_exceptions(vec![details]);
        if let Some(properties) = properties {
            *data.properties_mut() = properties;
        }
        if let Some(measurements) = measurements {
            data.set_measurements(measurements);
        }

        self.channel.add_to_queue(data, &self.context, None);
    }

    /// Sends a call to an external component, like SQL or an HTTP
    /// endpoint.
    #[allow(clippy::too_many_arguments)]
    pub fn track_dependency(
        &mut self,
        name: &str,
        dependency_type: &str,
        command: Option<&str>,
        start_time: Option<DateTime<Utc>>,
        duration_ms: i64,
        success: bool,
        result_code: Option<i64>,
        properties: Option<Properties>,
    ) {
        let mut data = RemoteDependencyData::new();
        data.set_name(name);
        data.set_dependency_type(dependency_type);
        if let Some(command) = command {
            data.set_data(command);
        }
        data.set_duration(timespan::format_ms(duration_ms));
        data.set_success(success);
        if let Some(result_code) = result_code {
            data.set_result_code(result_code);
        }
        if let Some(properties) = properties {
            *data.properties_mut() = properties;
        }

        self.channel.add_to_queue(data, &self.context, start_time);
    }

    /// Sends a page view.
    pub fn track_page_view(
        &mut self,
        name: &str,
        url: &str,
        duration_ms: i64,
        properties: Option<Properties>,
        measurements: Option<Measurements>,
    ) {
        let mut data = PageViewData::new();
        data.set_name(name);
        data.set_url(url);
        data.set_duration(timespan::format_ms(duration_ms));
        if let Some(properties) = properties {
            *data.properties_mut() = properties;
        }
        if let Some(measurements) = measurements {
            data.set_measurements(measurements);
        }

        self.channel.add_to_queue(data, &self.context, None);
    }

    /// Serializes the queue, clears it, and sends the batch in one
    /// blocking call.
    ///
    /// The queue is empty afterward whether or not the send succeeded;
    /// telemetry loss is preferred over blocking the application on a
    /// retry.
    pub fn flush(&mut self) -> Result<HttpResponse, TransportError> {
        let items = self.channel.queue().len();
        let request = self.channel.request()?;
        self.channel.flush();

        tracing::debug!(items, "sending telemetry batch");
        self.channel.sender().send(request)
    }
}

struct ResolvedFrame {
    method: String,
    file: Option<String>,
    line: Option<i64>,
}

/// Resolved frames, innermost first, with the capture machinery's own
/// frames dropped.
fn resolved_frames(backtrace: &Backtrace) -> Vec<ResolvedFrame> {
    backtrace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .filter_map(|symbol| {
            let method = symbol.name()?.to_string();
            if method.starts_with("backtrace::") {
                return None;
            }
            Some(ResolvedFrame {
                method,
                file: symbol
                    .filename()
                    .map(|path| path.display().to_string()),
                line: symbol.lineno().map(i64::from),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockSender;
    use serde_json::{json, Value};

    fn make_client() -> (TelemetryClient, MockSender) {
        let sender = MockSender::new();
        let context = TelemetryContext::new("11111111-1111-1111-1111-111111111111");
        let channel = TelemetryChannel::new(Box::new(sender.clone()));
        (TelemetryClient::with_parts(context, channel), sender)
    }

    fn decoded_queue(client: &TelemetryClient) -> Value {
        serde_json::from_str(&client.channel().serialized_queue()).unwrap()
    }

    fn sample_properties() -> Properties {
        let mut properties = Properties::new();
        properties.insert("InlineProperty".to_owned(), json!("test_value"));
        properties
    }

    #[test]
    fn new_client_targets_the_track_endpoint() {
        let client = TelemetryClient::new("ikey");
        assert_eq!(client.context().instrumentation_key(), "ikey");
        assert_eq!(
            client.channel().endpoint_url(),
            "https://dc.services.visualstudio.com/v2/track"
        );
        assert!(!client.channel().send_gzipped());
    }

    #[test]
    fn from_config_applies_endpoint_and_gzip() {
        let config = Config {
            instrumentation_key: Some("ikey".to_owned()),
            endpoint_url: "https://collector.internal/v2/track".to_owned(),
            send_gzipped: true,
        };
        let client = TelemetryClient::from_config(config);
        assert_eq!(client.context().instrumentation_key(), "ikey");
        assert_eq!(
            client.channel().endpoint_url(),
            "https://collector.internal/v2/track"
        );
        assert!(client.channel().send_gzipped());
    }

    #[test]
    fn track_event_builds_an_event_envelope() {
        let (mut client, _) = make_client();
        let mut measurements = Measurements::new();
        measurements.insert("duration".to_owned(), json!(42.0));
        client.track_event("myEvent", Some(sample_properties()), Some(measurements));

        let queue = decoded_queue(&client);
        let envelope = &queue[0];
        assert_eq!(envelope["ver"], json!(1));
        assert_eq!(envelope["name"], json!("Microsoft.ApplicationInsights.Event"));
        assert_eq!(envelope["sampleRate"], json!(100.0));
        assert_eq!(
            envelope["iKey"],
            json!("11111111-1111-1111-1111-111111111111")
        );
        assert_eq!(envelope["data"]["baseType"], json!("EventData"));
        assert_eq!(envelope["data"]["baseData"]["ver"], json!(2));
        assert_eq!(envelope["data"]["baseData"]["name"], json!("myEvent"));
        assert_eq!(
            envelope["data"]["baseData"]["properties"]["InlineProperty"],
            json!("test_value")
        );
        assert_eq!(
            envelope["data"]["baseData"]["measurements"]["duration"],
            json!(42.0)
        );
    }

    #[test]
    fn track_message_with_severity() {
        let (mut client, _) = make_client();
        client.track_message("myMessage", Some(SeverityLevel::Error), None);

        let queue = decoded_queue(&client);
        let base_data = &queue[0]["data"]["baseData"];
        assert_eq!(base_data["message"], json!("myMessage"));
        assert_eq!(base_data["severityLevel"], json!(3));
        assert_eq!(
            queue[0]["name"],
            json!("Microsoft.ApplicationInsights.Message")
        );
    }

    #[test]
    fn track_metric_with_aggregates() {
        let (mut client, _) = make_client();
        client.track_metric(
            "myMetric",
            42.0,
            Some(DataPointType::Aggregation),
            Some(5),
            Some(0.0),
            Some(1.0),
            Some(0.2),
            None,
        );

        let queue = decoded_queue(&client);
        let point = &queue[0]["data"]["baseData"]["metrics"][0];
        assert_eq!(
            point,
            &json!({"name": "myMetric", "kind": 1, "value": 42.0, "count": 5, "max": 1.0, "stdDev": 0.2})
        );
    }

    #[test]
    fn track_metric_defaults() {
        let (mut client, _) = make_client();
        client.track_metric("m", 1.5, None, None, None, None, None, None);

        let queue = decoded_queue(&client);
        let point = &queue[0]["data"]["baseData"]["metrics"][0];
        assert_eq!(point["kind"], json!(1));
        assert_eq!(point["count"], json!(0));
        assert_eq!(point["max"], json!(0.0));
        assert_eq!(point["stdDev"], json!(0.0));
        assert!(point.get("min").is_none());
    }

    #[test]
    fn track_request_fills_request_fields() {
        let (mut client, _) = make_client();
        client.track_request(
            "myRequest",
            "https://foo.bar",
            Utc::now(),
            3754,
            200,
            true,
            None,
            None,
        );

        let queue = decoded_queue(&client);
        let base_data = &queue[0]["data"]["baseData"];
        assert_eq!(base_data["duration"], json!("00:00:03.754"));
        assert_eq!(base_data["responseCode"], json!(200));
        assert_eq!(base_data["success"], json!(true));
        assert_eq!(base_data["name"], json!("myRequest"));
        assert_eq!(base_data["url"], json!("https://foo.bar"));
        assert!(!base_data["id"].as_str().unwrap().is_empty());
    }

    #[test]
    fn begin_request_does_not_enqueue() {
        let (mut client, _) = make_client();
        let request = client.begin_request("myRequest", "https://foo.bar", None);
        assert_eq!(client.channel().serialized_queue(), "[]");

        client.end_request(request, 3754, 200, false, None, None);
        let queue = decoded_queue(&client);
        assert_eq!(queue[0]["data"]["baseData"]["success"], json!(false));
    }

    #[test]
    fn begin_end_matches_one_shot_track_request() {
        use chrono::TimeZone;
        let start = Utc.with_ymd_and_hms(2020, 3, 1, 9, 0, 0).unwrap();

        let (mut client, _) = make_client();
        let request = client.begin_request("myRequest", "https://foo.bar", Some(start));
        client.end_request(request, 3754, 200, true, None, None);
        client.track_request(
            "myRequest",
            "https://foo.bar",
            start,
            3754,
            200,
            true,
            None,
            None,
        );

        let queue = decoded_queue(&client);
        let mut paired = queue[0].clone();
        let mut one_shot = queue[1].clone();
        for envelope in [&mut paired, &mut one_shot] {
            let id = envelope["data"]["baseData"]["id"].take();
            assert!(!id.as_str().unwrap().is_empty());
        }
        assert_eq!(paired, one_shot);
    }

    #[test]
    fn track_dependency_with_result_code() {
        let (mut client, _) = make_client();
        client.track_dependency(
            "Sql",
            "SQL",
            Some("SELECT * FROM hola;"),
            Some(Utc::now()),
            100,
            true,
            Some(200),
            None,
        );

        let queue = decoded_queue(&client);
        let base_data = &queue[0]["data"]["baseData"];
        assert_eq!(base_data["name"], json!("Sql"));
        assert_eq!(base_data["type"], json!("SQL"));
        assert_eq!(base_data["data"], json!("SELECT * FROM hola;"));
        assert_eq!(base_data["duration"], json!("00:00:00.100"));
        assert_eq!(base_data["success"], json!(true));
        assert_eq!(base_data["resultCode"], json!("200"));
        assert_eq!(
            queue[0]["name"],
            json!("Microsoft.ApplicationInsights.RemoteDependency")
        );
    }

    #[test]
    fn track_dependency_without_command_omits_data_key() {
        let (mut client, _) = make_client();
        client.track_dependency("https://example.com/api/method", "HTTP", None, None, 100, false, Some(503), None);

        let queue = decoded_queue(&client);
        let base_data = &queue[0]["data"]["baseData"];
        assert!(base_data.get("data").is_none());
        assert_eq!(base_data["success"], json!(false));
        assert_eq!(base_data["resultCode"], json!("503"));
    }

    #[test]
    fn track_page_view_formats_duration() {
        let (mut client, _) = make_client();
        client.track_page_view("myPageView", "https://www.foo.com", 256, None, None);

        let queue = decoded_queue(&client);
        let base_data = &queue[0]["data"]["baseData"];
        assert_eq!(base_data["name"], json!("myPageView"));
        assert_eq!(base_data["url"], json!("https://www.foo.com"));
        assert_eq!(base_data["duration"], json!("00:00:00.256"));
    }

    #[test]
    fn track_exception_captures_type_and_stack() {
        let (mut client, _) = make_client();
        let error = std::io::Error::other("boom");
        client.track_exception(&error, Some(sample_properties()), None);

        let queue = decoded_queue(&client);
        let exception = &queue[0]["data"]["baseData"]["exceptions"][0];
        assert_eq!(exception["id"], json!(1));
        assert!(exception.get("outerId").is_none());
        assert_eq!(exception["typeName"], json!("std::io::error::Error"));
        assert!(exception["message"].as_str().unwrap().starts_with("boom"));
        assert_eq!(exception["hasFullStack"], json!(true));

        let frames = exception["parsedStack"].as_array().unwrap();
        if !frames.is_empty() {
            // Outermost first; innermost carries level "0" as a string.
            assert_eq!(frames[frames.len() - 1]["level"], json!("0"));
            let top_level: usize = frames[0]["level"].as_str().unwrap().parse().unwrap();
            assert_eq!(top_level, frames.len() - 1);
        }
        assert_eq!(
            queue[0]["name"],
            json!("Microsoft.ApplicationInsights.Exception")
        );
    }

    #[test]
    fn context_properties_merged_into_tracked_items() {
        let (mut client, _) = make_client();
        client
            .context_mut()
            .properties_mut()
            .insert("MyCustomProperty".to_owned(), json!(42));
        client.track_event("myEvent", Some(sample_properties()), None);

        let queue = decoded_queue(&client);
        let properties = &queue[0]["data"]["baseData"]["properties"];
        assert_eq!(properties["InlineProperty"], json!("test_value"));
        assert_eq!(properties["MyCustomProperty"], json!(42));
    }

    #[test]
    fn flush_sends_once_and_clears() {
        let (mut client, sender) = make_client();
        client.track_event("myEvent", None, None);

        let response = client.flush().unwrap();
        assert_eq!(response.status_code, 200);
        assert!(client.channel().queue().is_empty());

        let sent = sender.requests();
        assert_eq!(sent.len(), 1);
        let body: Value = serde_json::from_slice(&sent[0].body).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[test]
    fn flush_clears_even_when_the_send_fails() {
        let sender = MockSender::failing();
        let context = TelemetryContext::new("ikey");
        let channel = TelemetryChannel::new(Box::new(sender));
        let mut client = TelemetryClient::with_parts(context, channel);

        client.track_event("myEvent", None, None);
        let result = client.flush();
        assert!(result.is_err());
        assert!(client.channel().queue().is_empty());
        assert_eq!(client.channel().serialized_queue(), "[]");
    }
}
