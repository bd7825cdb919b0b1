//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{ProbeOptions, TCP_CONNECT_TIMEOUT_SECS};

/// Initializes the HTTP client shared by every probe in a session.
///
/// Creates a `reqwest::Client` configured with:
/// - Per-attempt timeout from the options (connect phase capped separately)
/// - Redirects disabled; the controller follows them itself so each hop is
///   one counted attempt
/// - No idle connection reuse, so every attempt is a fresh connection
/// - Invalid certificates accepted; certificate problems are reported in
///   `tls_data.error` instead of hiding the status code
/// - TLS info exposed on responses when `capture_tls` is set
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(options: &ProbeOptions) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let timeout = options.timeout();
    let connect_timeout = Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS).min(timeout);

    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(0)
        .danger_accept_invalid_certs(true)
        .tls_info(options.capture_tls)
        .user_agent(options.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
