//! Data types produced by a probing session.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::resolve_scheme;
use crate::error_handling::ProbeError;

/// A raw input together with the URL it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// What the caller passed in
    pub input: String,
    /// `input` with a scheme added when it had none
    pub url: String,
}

impl Target {
    pub fn new(input: impl Into<String>) -> Self {
        let input = input.into();
        let url = resolve_scheme(&input);
        Self { input, url }
    }

    /// Whether the resolved URL carries an http(s) scheme. False only when
    /// the input could not be parsed and was kept as-is.
    pub fn is_schemed(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }
}

/// TLS certificate details captured from the peer of a completed probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TlsCertificateInfo {
    /// Expiry of the leaf certificate; `None` when no certificate was seen
    pub not_after: Option<DateTime<Utc>>,
    /// TLS-layer problem (handshake failure, expired or mismatched
    /// certificate); empty when there was none
    pub error: String,
}

impl TlsCertificateInfo {
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Terminal outcome for one target.
///
/// Exactly one is produced per target per session, however many retries or
/// redirect hops happened underneath. It is not modified after it reaches the
/// sink.
#[derive(Debug, Serialize)]
pub struct ProbeResult {
    /// The raw target as supplied
    pub input: String,
    /// The last URL requested (differs from the resolved input after redirects)
    pub url: String,
    /// Method of the chain that produced this result
    pub method: String,
    /// HTTP status of the final response; 0 when none was obtained
    pub status_code: u16,
    /// Elapsed time for the whole chain, e.g. `"312.4ms"`
    pub response_time: String,
    pub tls_data: Option<TlsCertificateInfo>,
    /// Body bytes read from the final response
    pub content_length: usize,
    /// Body bytes kept (lossy UTF-8), bounded by the save cap
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Requests sent, retries and redirects included
    pub attempts: u32,
    /// Redirect hops followed
    pub redirects: usize,
    /// Coarse failure message; empty on success
    pub error: String,
    /// Structured failure chain
    #[serde(skip)]
    pub err: Option<ProbeError>,
}

impl ProbeResult {
    /// A result for a target that never produced a response.
    pub fn failed(target: &Target, method: &str, elapsed: Duration, err: ProbeError) -> Self {
        let tls_data = err.tls_error().map(|detail| TlsCertificateInfo {
            not_after: None,
            error: detail.to_string(),
        });
        Self {
            input: target.input.clone(),
            url: target.url.clone(),
            method: method.to_string(),
            status_code: 0,
            response_time: format_response_time(elapsed),
            tls_data,
            content_length: 0,
            body: String::new(),
            attempts: 0,
            redirects: 0,
            error: err.error_type().as_str().to_string(),
            err: Some(err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.err.is_none() && self.error.is_empty()
    }
}

/// Formats an elapsed time the way it is reported in results.
pub fn format_response_time(elapsed: Duration) -> String {
    format!("{elapsed:?}")
}
