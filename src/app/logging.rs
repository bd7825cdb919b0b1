//! Progress and result logging.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::classify::{classify, present_error};
use crate::models::ProbeResult;

/// Logs progress information about an enumeration.
///
/// # Arguments
///
/// * `start_time` - The start time of the enumeration
/// * `completed` - Atomic counter of delivered results
/// * `total` - Number of targets in the enumeration
pub fn log_progress(start_time: std::time::Instant, completed: &Arc<AtomicUsize>, total: usize) {
    let elapsed = start_time.elapsed();
    let completed = completed.load(Ordering::SeqCst);
    let elapsed_secs = elapsed.as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Probed {}/{} targets in {:.2} seconds (~{:.2} targets/sec)",
        completed, total, elapsed_secs, rate
    );
}

/// Renders one result as a single log line.
///
/// `tlsNotAfter` and `tlsError` only appear when there is something to show,
/// and `error` only for failed probes.
pub fn format_result_line(result: &ProbeResult) -> String {
    let mut line = format!(
        "Ping url input={} statusCode={} responseTime={} status={}",
        result.input,
        result.status_code,
        result.response_time,
        classify(result)
    );
    if let Some(tls) = &result.tls_data {
        if let Some(not_after) = tls.not_after {
            line.push_str(&format!(" tlsNotAfter={}", not_after.to_rfc3339()));
        }
        if tls.has_error() {
            line.push_str(&format!(" tlsError={:?}", tls.error));
        }
    }
    if let Some(error) = present_error(result) {
        line.push_str(&format!(" error={error:?}"));
    }
    line
}
