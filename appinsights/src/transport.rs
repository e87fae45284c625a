// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

//! HTTP boundary of the SDK.
//!
//! The channel builds an [`HttpRequest`]; anything implementing
//! [`HttpSender`] can carry it. The default sender is a blocking reqwest
//! client; tests use [`MockSender`].

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors surfaced by a sender.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection to the endpoint could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request exceeded the transport's timeout.
    #[error("request timed out")]
    TimedOut,

    /// The request could not be constructed, e.g. a malformed URL.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred while sending or reading the response.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Standard HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An outgoing HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,

    /// Absolute URL string.
    pub url: String,

    /// Request headers as a list of (name, value) pairs.
    ///
    /// Vec preserves insertion order and allows duplicate header names,
    /// both of which are valid in HTTP.
    pub headers: Vec<(String, String)>,

    /// Request body bytes. Empty for requests with no body.
    pub body: bytes::Bytes,
}

impl HttpRequest {
    /// A request with the given method and URL, no headers and no body.
    pub fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: bytes::Bytes::new(),
        }
    }

    /// First value carried by the named header, if any.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response received from the endpoint.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code (e.g. 200, 404, 503).
    pub status_code: u16,

    /// Response headers as a list of (name, value) pairs.
    pub headers: Vec<(String, String)>,

    /// Response body bytes.
    pub body: bytes::Bytes,
}

/// Carries one request to the ingestion endpoint.
///
/// A non-success status is not an error at this layer; the response is
/// handed back as-is and interpreting the status is the caller's business.
pub trait HttpSender: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking reqwest-backed sender, the default for real use.
#[derive(Debug, Default)]
pub struct ReqwestSender {
    client: reqwest::blocking::Client,
}

impl ReqwestSender {
    pub fn new() -> Self {
        Self::default()
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::TimedOut
    } else if error.is_connect() {
        TransportError::ConnectionFailed(error.to_string())
    } else if error.is_builder() {
        TransportError::InvalidConfig(error.to_string())
    } else {
        TransportError::IoError(error.to_string())
    }
}

impl HttpSender for ReqwestSender {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = builder.body(request.body.to_vec());

        let response = builder.send().map_err(map_reqwest_error)?;
        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().map_err(map_reqwest_error)?;

        Ok(HttpResponse {
            status_code,
            headers,
            body,
        })
    }
}

/// Records every request instead of sending it. Cloning shares the record.
#[derive(Clone, Debug, Default)]
pub struct MockSender {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    fail: bool,
}

impl MockSender {
    /// A sender that accepts everything with a 200.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every send fails with a connection error.
    pub fn failing() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Requests recorded so far, in send order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("mock sender lock").clone()
    }
}

impl HttpSender for MockSender {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.fail {
            return Err(TransportError::ConnectionFailed(
                "mock sender configured to fail".to_owned(),
            ));
        }
        self.requests.lock().expect("mock sender lock").push(request);
        Ok(HttpResponse {
            status_code: 200,
            headers: Vec::new(),
            body: bytes::Bytes::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_defaults() {
        let request = HttpRequest::new(HttpMethod::Post, "https://localhost/track".to_owned());
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.headers.is_empty());
        assert!(request.body.is_empty());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut request = HttpRequest::new(HttpMethod::Post, "https://x".to_owned());
        request
            .headers
            .push(("Content-Type".to_owned(), "application/json".to_owned()));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("Accept"), None);
    }

    #[test]
    fn mock_sender_records_requests() {
        let sender = MockSender::new();
        let handle = sender.clone();

        let mut request = HttpRequest::new(HttpMethod::Post, "https://x".to_owned());
        request.body = bytes::Bytes::from_static(b"[]");
        let response = sender.send(request).unwrap();

        assert_eq!(response.status_code, 200);
        let recorded = handle.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].body.as_ref(), b"[]");
    }

    #[test]
    fn failing_sender_reports_connection_failure() {
        let sender = MockSender::failing();
        let request = HttpRequest::new(HttpMethod::Post, "https://x".to_owned());
        let error = sender.send(request).unwrap_err();
        assert!(matches!(error, TransportError::ConnectionFailed(_)));
        assert!(sender.requests().is_empty());
    }

    #[test]
    fn transport_error_display() {
        let error = TransportError::ConnectionFailed("refused".to_owned());
        assert_eq!(error.to_string(), "connection failed: refused");
        assert_eq!(TransportError::TimedOut.to_string(), "request timed out");
    }
}
