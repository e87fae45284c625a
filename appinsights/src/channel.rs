// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{Map, Value};
use std::io::Write;

use crate::context::TelemetryContext;
use crate::data::{Data, Envelope, TelemetryData};
use crate::transport::{HttpMethod, HttpRequest, HttpSender, TransportError};

/// Default ingestion endpoint.
pub const TRACK_URL: &str = "https://dc.services.visualstudio.com/v2/track";

/// Manages the queue of telemetry items to send and builds the outbound
/// request.
///
/// The queue is strictly FIFO and unbounded: items go out in insertion
/// order, nothing is deduplicated, and only [`TelemetryChannel::flush`]
/// empties it.
pub struct TelemetryChannel {
    queue: Vec<Envelope>,
    endpoint_url: String,
    sender: Box<dyn HttpSender>,
    send_gzipped: bool,
}

impl TelemetryChannel {
    pub fn new(sender: Box<dyn HttpSender>) -> Self {
        Self::with_endpoint(sender, TRACK_URL)
    }

    pub fn with_endpoint(sender: Box<dyn HttpSender>, endpoint_url: impl Into<String>) -> Self {
        Self {
            queue: Vec::new(),
            endpoint_url: endpoint_url.into(),
            sender,
            send_gzipped: false,
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn set_endpoint_url(&mut self, endpoint_url: impl Into<String>) {
        self.endpoint_url = endpoint_url.into();
    }

    pub fn queue(&self) -> &[Envelope] {
        &self.queue
    }

    pub fn send_gzipped(&self) -> bool {
        self.send_gzipped
    }

    pub fn set_send_gzipped(&mut self, send_gzipped: bool) {
        self.send_gzipped = send_gzipped;
    }

    pub fn sender(&self) -> &dyn HttpSender {
        self.sender.as_ref()
    }

    pub fn set_sender(&mut self, sender: Box<dyn HttpSender>) {
        self.sender = sender;
    }

    /// Wraps a telemetry item into an envelope and appends it to the queue.
    ///
    /// The envelope takes its time from `start_time` when given, otherwise
    /// from the item's own creation time. Context tags are merged in a
    /// fixed order; the prefixes are disjoint so later entities can never
    /// clobber earlier ones. Context properties fill gaps in the item's own
    /// properties, never overwrite them.
    pub fn add_to_queue<T: TelemetryData>(
        &mut self,
        mut data: T,
        context: &TelemetryContext,
        start_time: Option<DateTime<Utc>>,
    ) {
        let mut envelope = Envelope::new();
        envelope.set_name(data.envelope_type_name());
        envelope.set_time(start_time.unwrap_or_else(|| data.time()));
        envelope.set_instrumentation_key(context.instrumentation_key());
        envelope.set_tags(merged_tags(context));

        let context_properties = context.properties();
        if !context_properties.is_empty() {
            let properties = data.properties_mut();
            for (key, value) in context_properties {
                if !properties.contains_key(key) {
                    properties.insert(key.clone(), value.clone());
                }
            }
        }

        let mut wrapper = Data::new();
        wrapper.set_base_type(data.base_type());
        wrapper.set_base_data(data.to_value());
        envelope.set_data(wrapper);

        tracing::debug!(
            item = envelope.name().unwrap_or_default(),
            queued = self.queue.len() + 1,
            "queued telemetry item"
        );
        self.queue.push(envelope);
    }

    /// The whole queue as the wire JSON array. An empty queue is `[]`.
    pub fn serialized_queue(&self) -> String {
        let envelopes: Vec<Value> = self.queue.iter().map(Envelope::to_value).collect();
        Value::Array(envelopes).to_string()
    }

    /// Builds the POST request for the current queue without touching it.
    pub fn request(&self) -> Result<HttpRequest, TransportError> {
        let serialized = self.serialized_queue();

        let mut request = HttpRequest::new(HttpMethod::Post, self.endpoint_url.clone());
        request
            .headers
            .push(("Accept".to_owned(), "application/json".to_owned()));
        request.headers.push((
            "Content-Type".to_owned(),
            "application/json; charset=utf-8".to_owned(),
        ));

        let body = if self.send_gzipped {
            request
                .headers
                .push(("Content-Encoding".to_owned(), "gzip".to_owned()));
            gzip(serialized.as_bytes())?
        } else {
            serialized.into_bytes()
        };
        request.body = bytes::Bytes::from(body);

        Ok(request)
    }

    /// Empties the queue. Sending is the caller's responsibility.
    pub fn flush(&mut self) {
        self.queue.clear();
    }
}

fn merged_tags(context: &TelemetryContext) -> Map<String, Value> {
    let mut tags = Map::new();
    for part in [
        context.application().to_tags(),
        context.device().to_tags(),
        context.cloud().to_tags(),
        context.location().to_tags(),
        context.operation().to_tags(),
        context.session().to_tags(),
        context.user().to_tags(),
        context.internal().to_tags(),
    ] {
        tags.extend(part);
    }
    tags
}

fn gzip(input: &[u8]) -> Result<Vec<u8>, TransportError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(input)
        .and_then(|_| encoder.finish())
        .map_err(|error| TransportError::IoError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EventData;
    use crate::transport::MockSender;
    use serde_json::json;
    use std::io::Read;

    fn channel() -> TelemetryChannel {
        TelemetryChannel::new(Box::new(MockSender::new()))
    }

    #[test]
    fn default_endpoint() {
        let channel = channel();
        assert_eq!(
            channel.endpoint_url(),
            "https://dc.services.visualstudio.com/v2/track"
        );
        assert!(channel.queue().is_empty());
    }

    #[test]
    fn endpoint_is_overridable() {
        let mut channel = channel();
        channel.set_endpoint_url("https://foo.com");
        assert_eq!(channel.endpoint_url(), "https://foo.com");
    }

    #[test]
    fn empty_queue_serializes_to_empty_array() {
        assert_eq!(channel().serialized_queue(), "[]");
    }

    #[test]
    fn flush_empties_the_queue() {
        let mut channel = channel();
        let context = TelemetryContext::new("ikey");
        let mut event = EventData::new();
        event.set_name("e");
        channel.add_to_queue(event, &context, None);
        assert_eq!(channel.queue().len(), 1);

        channel.flush();
        assert!(channel.queue().is_empty());
        assert_eq!(channel.serialized_queue(), "[]");
    }

    #[test]
    fn one_item_carries_every_context_prefix() {
        let mut channel = channel();
        let mut context = TelemetryContext::new("ikey");
        context.application_mut().set_ver("1.0.0.0");
        context.device_mut().set_id("my_device_id");
        context.cloud_mut().set_role("my_role_name");
        context.location_mut().set_ip("127.0.0.0");
        context.session_mut().set_id("my_session_id");
        // user, operation and internal are seeded at construction

        let mut event = EventData::new();
        event.set_name("e");
        channel.add_to_queue(event, &context, None);

        let envelope = &channel.queue()[0];
        let tags = envelope.tags().unwrap();
        for prefix in [
            "ai.application.",
            "ai.device.",
            "ai.cloud.",
            "ai.location.",
            "ai.operation.",
            "ai.session.",
            "ai.user.",
            "ai.internal.",
        ] {
            assert!(
                tags.keys().any(|key| key.starts_with(prefix)),
                "missing tag prefix {prefix}"
            );
        }
    }

    #[test]
    fn context_properties_fill_gaps_only() {
        let mut channel = channel();
        let mut context = TelemetryContext::new("ikey");
        context
            .properties_mut()
            .insert("shared".to_owned(), json!("from_context"));
        context
            .properties_mut()
            .insert("extra".to_owned(), json!(42));

        let mut event = EventData::new();
        event.set_name("e");
        event
            .properties_mut()
            .insert("shared".to_owned(), json!("from_event"));
        channel.add_to_queue(event, &context, None);

        let value = channel.queue()[0].to_value();
        let properties = &value["data"]["baseData"]["properties"];
        assert_eq!(properties["shared"], json!("from_event"));
        assert_eq!(properties["extra"], json!(42));
    }

    #[test]
    fn explicit_start_time_wins_over_item_time() {
        use chrono::TimeZone;

        let mut channel = channel();
        let context = TelemetryContext::new("ikey");
        let start = Utc.with_ymd_and_hms(2009, 6, 15, 13, 45, 30).unwrap();

        let mut event = EventData::new();
        event.set_name("e");
        channel.add_to_queue(event, &context, Some(start));

        assert_eq!(channel.queue()[0].time(), Some("2009-06-15T13:45:30.000Z"));
    }

    #[test]
    fn serialized_queue_round_trips_through_json() {
        let mut channel = channel();
        let context = TelemetryContext::new("ikey");
        let mut event = EventData::new();
        event.set_name("e");
        channel.add_to_queue(event, &context, None);

        let serialized = channel.serialized_queue();
        let decoded: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(decoded.to_string(), serialized);
    }

    #[test]
    fn plain_request_has_json_headers_and_no_content_encoding() {
        let channel = channel();
        let request = channel.request().unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, TRACK_URL);
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(
            request.header("Content-Type"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(request.header("Content-Encoding"), None);
        assert_eq!(request.body.as_ref(), b"[]");
    }

    #[test]
    fn gzipped_request_is_marked_and_decodable() {
        let mut channel = channel();
        channel.set_send_gzipped(true);
        let context = TelemetryContext::new("ikey");
        let mut event = EventData::new();
        event.set_name("e");
        channel.add_to_queue(event, &context, None);
        let expected = channel.serialized_queue();

        let request = channel.request().unwrap();
        assert_eq!(request.header("Content-Encoding"), Some("gzip"));

        let mut decoder = flate2::read::GzDecoder::new(request.body.as_ref());
        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, expected);
    }
}
