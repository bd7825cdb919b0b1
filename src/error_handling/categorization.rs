//! Error categorization and retry strategy.
//!
//! This module turns `reqwest` failures into `ProbeError`s and configures the
//! backoff used between retries.

use std::error::Error as StdError;
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use super::stats::ProcessingStats;
use super::types::{ErrorType, ProbeError};

/// Message fragments that identify a TLS-layer failure when no typed
/// `rustls::Error` can be found in the chain.
const TLS_MESSAGE_MARKERS: &[&str] = &["tls", "ssl", "certificate", "handshake"];

/// Creates an exponential backoff retry strategy.
///
/// Returns a retry strategy configured with:
/// - Initial delay: `initial_delay_ms` milliseconds (at least 1)
/// - Backoff factor: `RETRY_FACTOR` (doubles delay each retry)
/// - Maximum delay: `RETRY_MAX_DELAY_SECS` seconds
/// - At most `retries` delays, i.e. `retries + 1` attempts in total
///
/// `ExponentialBackoff` yields `base^n * factor` starting at `n = 1`, so the
/// first delay is prepended and the backoff covers the doubled ones.
pub fn get_retry_strategy(initial_delay_ms: u64, retries: usize) -> impl Iterator<Item = Duration> {
    let initial = initial_delay_ms.max(1);
    let max_delay = Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS);
    std::iter::once(Duration::from_millis(initial).min(max_delay))
        .chain(
            ExponentialBackoff::from_millis(crate::config::RETRY_FACTOR)
                .factor(initial)
                .max_delay(max_delay),
        )
        .take(retries)
}

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// Probes never call `error_for_status()`, so only transport-level kinds are
/// inspected here; HTTP status codes are reported, not treated as errors.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if tls_error_detail(error).is_some() {
        ErrorType::TlsHandshakeError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Maps a failed `send()` into a `ProbeError`.
///
/// Timeouts are checked before TLS so a handshake that stalls counts as a
/// timeout; handshake failures keep their TLS message for `tls_data.error`.
pub fn classify_send_error(url: &str, error: reqwest::Error) -> ProbeError {
    let url = url.to_string();
    if error.is_builder() {
        return ProbeError::Request { url, source: error };
    }
    if error.is_timeout() {
        return ProbeError::Timeout { url, source: error };
    }
    if let Some(detail) = tls_error_detail(&error) {
        return ProbeError::Tls {
            url,
            detail,
            source: error,
        };
    }
    ProbeError::Transport { url, source: error }
}

/// Finds the TLS-layer message in a `reqwest` error chain, if any.
///
/// `std::io::Error` hides its payload from `source()`, and the rustls stream
/// wraps a handshake failure in two of them (`Other` around `InvalidData`),
/// so every nested I/O error is opened with `get_ref()` before looking for a
/// `rustls::Error`.
pub(crate) fn tls_error_detail(error: &reqwest::Error) -> Option<String> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(cause) = current {
        if let Some(tls_err) = cause.downcast_ref::<rustls::Error>() {
            return Some(tls_err.to_string());
        }
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            if let Some(tls_err) = rustls_error_in_io(io_err) {
                return Some(tls_err.to_string());
            }
        }
        current = cause.source();
    }

    let mut current: Option<&(dyn StdError + 'static)> = error.source();
    while let Some(cause) = current {
        let msg = cause.to_string();
        if is_tls_message(&msg) {
            return Some(msg);
        }
        current = cause.source();
    }
    None
}

/// Unwraps nested `std::io::Error` payloads until a `rustls::Error` turns up.
fn rustls_error_in_io(io_err: &std::io::Error) -> Option<&rustls::Error> {
    let mut payload = io_err.get_ref();
    while let Some(inner) = payload {
        if let Some(tls_err) = inner.downcast_ref::<rustls::Error>() {
            return Some(tls_err);
        }
        payload = inner
            .downcast_ref::<std::io::Error>()
            .and_then(std::io::Error::get_ref);
    }
    None
}

fn is_tls_message(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    TLS_MESSAGE_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Records a probe failure in the session statistics.
pub fn update_error_stats(stats: &ProcessingStats, error: &ProbeError) {
    stats.increment_error(error.error_type());
}
