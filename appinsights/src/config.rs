// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

use std::env;

use crate::channel::TRACK_URL;

/// Client configuration.
///
/// Nothing here is validated; a malformed key or URL flows through to the
/// wire and is the ingestion service's problem to reject.
#[derive(Clone, Debug)]
pub struct Config {
    /// Routes telemetry to the right application in the backend store.
    pub instrumentation_key: Option<String>,
    /// Endpoint the serialized queue is POSTed to.
    pub endpoint_url: String,
    /// Gzip the request body before sending.
    pub send_gzipped: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instrumentation_key: None,
            endpoint_url: TRACK_URL.to_owned(),
            send_gzipped: false,
        }
    }
}

pub struct FromEnv {}

impl FromEnv {
    const APPINSIGHTS_INSTRUMENTATIONKEY: &'static str = "APPINSIGHTS_INSTRUMENTATIONKEY";
    const APPINSIGHTS_ENDPOINT_URL: &'static str = "APPINSIGHTS_ENDPOINT_URL";
    const APPINSIGHTS_GZIP: &'static str = "APPINSIGHTS_GZIP";

    fn instrumentation_key() -> Option<String> {
        env::var(Self::APPINSIGHTS_INSTRUMENTATIONKEY)
            .ok()
            .filter(|key| !key.is_empty())
    }

    fn endpoint_url() -> Option<String> {
        env::var(Self::APPINSIGHTS_ENDPOINT_URL)
            .ok()
            .filter(|url| !url.is_empty())
    }

    fn gzip_enabled() -> Option<bool> {
        let var = env::var(Self::APPINSIGHTS_GZIP).ok()?;
        Some(var == "true" || var == "1")
    }
}

impl Config {
    /// Reads the `APPINSIGHTS_*` environment on top of the defaults.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            instrumentation_key: FromEnv::instrumentation_key(),
            endpoint_url: FromEnv::endpoint_url().unwrap_or(default.endpoint_url),
            send_gzipped: FromEnv::gzip_enabled().unwrap_or(default.send_gzipped),
        }
    }
}
