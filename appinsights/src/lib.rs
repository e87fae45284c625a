// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

//! Client SDK for the Application Insights ingestion service.
//!
//! Tracking calls build typed data contracts, the channel wraps each one
//! into an envelope stamped with context tags and queues it, and a flush
//! serializes the queue to JSON and POSTs it to the track endpoint.
//!
//! ```no_run
//! use appinsights::TelemetryClient;
//!
//! let mut client = TelemetryClient::new("11111111-1111-1111-1111-111111111111");
//! client.track_event("application_started", None, None);
//! client.flush().expect("telemetry send failed");
//! ```

pub mod channel;
pub mod client;
pub mod config;
pub mod context;
pub mod data;
pub mod session;
pub mod timespan;
pub mod transport;

pub use channel::TelemetryChannel;
pub use client::TelemetryClient;
pub use config::Config;
pub use context::TelemetryContext;

/// Version tag stamped into `ai.internal.sdkVersion` on every envelope.
pub const SDK_VERSION: &str = concat!("rust:", env!("CARGO_PKG_VERSION"));
