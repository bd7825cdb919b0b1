//! Error type definitions.
//!
//! This module defines the session-level and per-target error types, plus the
//! error, warning, and info categories counted during a probing session.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Invalid session options. Fatal: reported before any probing starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No HTTP method configured.
    #[error("at least one HTTP method must be configured")]
    NoMethods,

    /// A method that is not a valid HTTP token.
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// A valid but non-standard method used without `unsafe_mode`.
    #[error("non-standard HTTP method {0:?} requires unsafe mode")]
    NonStandardMethod(String),

    /// Timeout must be a positive number of seconds.
    #[error("timeout must be greater than zero seconds (got {0})")]
    InvalidTimeout(u64),

    /// Worker pool needs at least one slot.
    #[error("max concurrency must be greater than zero (got {0})")]
    InvalidConcurrency(usize),

    /// More worker slots than a semaphore can hold.
    #[error("max concurrency must be at most {max} (got {got})")]
    ConcurrencyTooLarge { got: usize, max: usize },

    /// A fixed User-Agent was requested but it is blank.
    #[error("user agent must not be empty when random agents are disabled")]
    EmptyUserAgent,
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// The options failed validation.
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),

    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failure of a single probe attempt (or of a whole target).
///
/// Carried in `ProbeResult::err`. The `source()` of each variant is the
/// underlying cause, which is what gets presented when the result is
/// reported.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The resolved target does not parse as a URL.
    #[error("invalid url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parses but is not something we can probe over HTTP.
    #[error("unsupported url {url:?}: {reason}")]
    UnsupportedUrl { url: String, reason: String },

    /// The method is not a valid HTTP token.
    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    /// The request could not be built (bad header, unusable URL).
    #[error("could not build request for {url}")]
    Request {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The attempt hit its deadline.
    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The TLS handshake failed; `detail` is what ends up in `tls_data.error`.
    #[error("TLS handshake with {url} failed: {detail}")]
    Tls {
        url: String,
        detail: String,
        #[source]
        source: ReqwestError,
    },

    /// Connect, DNS, or protocol failure.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The session was cancelled before this target finished.
    #[error("probe cancelled")]
    Cancelled,

    /// The worker running this target panicked.
    #[error("probe worker panicked: {0}")]
    WorkerPanicked(String),
}

impl ProbeError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Only transport-level failures (timeouts, connect/DNS errors, TLS
    /// handshakes) are retried. Malformed URLs and requests fail the same way
    /// every time, and cancellation is terminal.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ProbeError::Timeout { .. } | ProbeError::Tls { .. } | ProbeError::Transport { .. }
        )
    }

    /// TLS-layer error message, if this failure happened during the handshake.
    pub fn tls_error(&self) -> Option<&str> {
        match self {
            ProbeError::Tls { detail, .. } => Some(detail.as_str()),
            _ => None,
        }
    }

    /// The statistics category for this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ProbeError::InvalidUrl { .. } | ProbeError::UnsupportedUrl { .. } => {
                ErrorType::InvalidUrl
            }
            ProbeError::InvalidMethod(_) | ProbeError::Request { .. } => {
                ErrorType::HttpRequestBuilderError
            }
            ProbeError::Timeout { .. } => ErrorType::HttpRequestTimeoutError,
            ProbeError::Tls { .. } => ErrorType::TlsHandshakeError,
            ProbeError::Transport { source, .. } => {
                super::categorization::categorize_reqwest_error(source)
            }
            ProbeError::Cancelled => ErrorType::ProbeCancelled,
            ProbeError::WorkerPanicked(_) => ErrorType::WorkerPanicked,
        }
    }
}

/// Types of errors that can end a probe.
///
/// The coarse `error` string of a failed `ProbeResult` is the `as_str()` of
/// one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Input errors
    InvalidUrl,
    HttpRequestBuilderError,
    // HTTP/Network errors
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestRequestError,
    HttpRequestRedirectError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
    // TLS errors
    TlsHandshakeError,
    // Session errors
    ProbeCancelled,
    WorkerPanicked,
}

/// Types of warnings that can occur during probing.
///
/// Warnings indicate something odd that did not stop the target from being
/// probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    UnparsableTarget,      // Scheme could not be inferred, raw input used as-is
    BodyReadError,         // Response obtained but the body stream failed midway
    MissingLocationHeader, // 3xx without a usable Location header
    TlsCertificateProblem, // Answered with an expired or mismatched certificate
}

/// Types of informational metrics recorded during probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    HttpRedirect,         // At least one redirect was followed
    HttpsRedirect,        // HTTP to HTTPS redirect
    MultipleRedirects,    // More than one hop
    RedirectLimitReached, // Chain stopped at max_redirects
    Retried,              // At least one retry was needed
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidUrl => "Invalid URL",
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::TlsHandshakeError => "TLS handshake error",
            ErrorType::ProbeCancelled => "Probe cancelled",
            ErrorType::WorkerPanicked => "Probe worker panicked",
        }
    }
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::UnparsableTarget => "Unparsable target",
            WarningType::BodyReadError => "Body read error",
            WarningType::MissingLocationHeader => "Redirect without Location header",
            WarningType::TlsCertificateProblem => "TLS certificate problem",
        }
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::HttpRedirect => "HTTP redirect",
            InfoType::HttpsRedirect => "HTTP to HTTPS redirect",
            InfoType::MultipleRedirects => "Multiple redirects",
            InfoType::RedirectLimitReached => "Redirect limit reached",
            InfoType::Retried => "Retried after transport failure",
        }
    }
}
