//! Retry and redirect handling for one target.
//!
//! A target is probed as a chain of hops. Each hop is one URL, attempted
//! until it answers or the retry budget runs out; a 3xx answer with a usable
//! `Location` moves the chain to the next hop. The retry and redirect budgets
//! are independent and both span the whole chain, so a retry spent on the
//! first hop is not available to the third.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use log::{debug, warn};
use tokio_retry::RetryIf;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::app::{resolve_location, validate_target_url};
use crate::error_handling::{
    get_retry_strategy, update_error_stats, InfoType, ProbeError, WarningType,
};
use crate::models::{format_response_time, ProbeResult, Target};

use super::context::ProcessingContext;
use super::request::{execute, ProbeOutcome};

/// Statuses that carry a `Location` worth following.
const REDIRECT_STATUSES: &[u16] = &[301, 302, 303, 307, 308];

/// How a single method's chain ended.
enum ChainEnd {
    /// A response was obtained (possibly after redirects)
    Answered(ProbeOutcome),
    /// No hop produced a response
    Failed(ProbeError),
}

/// Running totals for one chain.
struct Chain {
    attempts: u32,
    retries_used: u32,
    redirects: usize,
}

/// Probes one target and returns its single terminal result.
///
/// Every configured method is tried in order, each with its own chain and
/// budgets. The first method whose chain obtains any response produces the
/// result; if none does, the result carries the last method's failure.
/// `attempts` counts every request sent for the target across all methods.
/// The elapsed time covers all of it.
pub async fn run_target(
    ctx: &ProcessingContext,
    target: &Target,
    cancel: &CancellationToken,
) -> ProbeResult {
    let start = Instant::now();
    let options = &ctx.options;
    let first_method = options.methods.first().map(String::as_str).unwrap_or("GET");

    let url = match validate_target_url(&target.url, options.unsafe_mode) {
        Ok(url) => url,
        Err(e) => {
            debug!("Skipping {:?}: {e}", target.input);
            update_error_stats(&ctx.stats, &e);
            return ProbeResult::failed(target, first_method, start.elapsed(), e);
        }
    };

    let mut total_attempts = 0u32;
    let mut last_failure = None;
    for method in &options.methods {
        let mut chain = Chain {
            attempts: 0,
            retries_used: 0,
            redirects: 0,
        };
        let end = run_chain(ctx, url.clone(), method, cancel, &mut chain).await;
        total_attempts += chain.attempts;
        record_chain_info(ctx, &url, &chain, &end);

        match end {
            ChainEnd::Answered(outcome) => {
                if outcome.tls_data.as_ref().is_some_and(|tls| tls.has_error()) {
                    ctx.stats.increment_warning(WarningType::TlsCertificateProblem);
                }
                return answered_result(target, method, start, total_attempts, &chain, outcome);
            }
            ChainEnd::Failed(e) => {
                debug!("{method} {url} failed after {} attempts: {e}", chain.attempts);
                let cancelled = matches!(e, ProbeError::Cancelled);
                last_failure = Some((method.as_str(), e));
                if cancelled {
                    break;
                }
            }
        }
    }

    let (method, err) = last_failure.unwrap_or((first_method, ProbeError::Cancelled));
    update_error_stats(&ctx.stats, &err);
    let mut result = ProbeResult::failed(target, method, start.elapsed(), err);
    result.attempts = total_attempts;
    result
}

/// Runs one method's chain of hops starting at `url`.
async fn run_chain(
    ctx: &ProcessingContext,
    mut url: Url,
    method: &str,
    cancel: &CancellationToken,
    chain: &mut Chain,
) -> ChainEnd {
    let options = &ctx.options;
    let mut method = method.to_string();
    let mut last_answer: Option<ProbeOutcome> = None;

    loop {
        let remaining = options.max_retries.saturating_sub(chain.retries_used);
        let strategy = get_retry_strategy(options.retry_initial_delay_ms, remaining as usize);
        let hop_attempts = AtomicU32::new(0);

        let attempt = RetryIf::spawn(
            strategy,
            || {
                hop_attempts.fetch_add(1, Ordering::SeqCst);
                execute(&ctx.client, &url, &method, options, cancel)
            },
            |e: &ProbeError| {
                let retry = e.is_retriable() && !cancel.is_cancelled();
                if retry {
                    debug!("Retrying {url}: {e}");
                }
                retry
            },
        );
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProbeError::Cancelled),
            result = attempt => result,
        };

        let sent = hop_attempts.load(Ordering::SeqCst);
        chain.attempts += sent;
        chain.retries_used += sent.saturating_sub(1);

        let outcome = match result {
            Ok(outcome) => outcome,
            // An earlier hop answered; report that instead of the failure
            Err(e) => {
                return match last_answer {
                    Some(previous) if !matches!(e, ProbeError::Cancelled) => {
                        debug!("Redirect target {url} failed ({e}), keeping previous response");
                        ChainEnd::Answered(previous)
                    }
                    _ => ChainEnd::Failed(e),
                };
            }
        };

        if outcome.body_read_failed {
            ctx.stats.increment_warning(WarningType::BodyReadError);
        }
        if !options.follow_redirects || !REDIRECT_STATUSES.contains(&outcome.status) {
            return ChainEnd::Answered(outcome);
        }
        if chain.redirects >= options.max_redirects {
            debug!(
                "Redirect limit ({}) reached at {}, reporting status {}",
                options.max_redirects, outcome.url, outcome.status
            );
            ctx.stats.increment_info(InfoType::RedirectLimitReached);
            return ChainEnd::Answered(outcome);
        }

        let next = match outcome.location.as_deref() {
            Some(location) => resolve_location(&outcome.url, location),
            None => {
                warn!("{} answered {} without a Location header", outcome.url, outcome.status);
                ctx.stats.increment_warning(WarningType::MissingLocationHeader);
                return ChainEnd::Answered(outcome);
            }
        };
        match next {
            Ok(next) => {
                debug!("{} -> {next} ({})", outcome.url, outcome.status);
                method = method_after_redirect(&method, outcome.status);
                chain.redirects += 1;
                url = next;
                last_answer = Some(outcome);
            }
            Err(e) => {
                warn!("Unusable redirect from {}: {e}", outcome.url);
                ctx.stats.increment_warning(WarningType::MissingLocationHeader);
                return ChainEnd::Answered(outcome);
            }
        }
    }
}

/// Method used for the next hop, following browser behavior: 303 turns
/// everything but HEAD into GET, and 301/302 turn POST into GET.
fn method_after_redirect(method: &str, status: u16) -> String {
    match status {
        303 if method != "HEAD" => "GET".to_string(),
        301 | 302 if method == "POST" => "GET".to_string(),
        _ => method.to_string(),
    }
}

fn record_chain_info(ctx: &ProcessingContext, start_url: &Url, chain: &Chain, end: &ChainEnd) {
    if chain.retries_used > 0 {
        ctx.stats.increment_info(InfoType::Retried);
    }
    if chain.redirects == 0 {
        return;
    }
    ctx.stats.increment_info(InfoType::HttpRedirect);
    if chain.redirects > 1 {
        ctx.stats.increment_info(InfoType::MultipleRedirects);
    }
    if let ChainEnd::Answered(outcome) = end {
        if start_url.scheme() == "http" && outcome.url.scheme() == "https" {
            ctx.stats.increment_info(InfoType::HttpsRedirect);
        }
    }
}

fn answered_result(
    target: &Target,
    method: &str,
    start: Instant,
    attempts: u32,
    chain: &Chain,
    outcome: ProbeOutcome,
) -> ProbeResult {
    ProbeResult {
        input: target.input.clone(),
        url: outcome.url.to_string(),
        method: method.to_string(),
        status_code: outcome.status,
        response_time: format_response_time(start.elapsed()),
        tls_data: outcome.tls_data,
        content_length: outcome.content_length,
        body: String::from_utf8_lossy(&outcome.body).into_owned(),
        attempts,
        redirects: chain.redirects,
        error: String::new(),
        err: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_after_redirect() {
        assert_eq!(method_after_redirect("POST", 303), "GET");
        assert_eq!(method_after_redirect("HEAD", 303), "HEAD");
        assert_eq!(method_after_redirect("POST", 302), "GET");
        assert_eq!(method_after_redirect("POST", 307), "POST");
        assert_eq!(method_after_redirect("PUT", 301), "PUT");
        assert_eq!(method_after_redirect("GET", 308), "GET");
    }

    #[test]
    fn test_redirect_statuses() {
        for status in [301, 302, 303, 307, 308] {
            assert!(REDIRECT_STATUSES.contains(&status));
        }
        assert!(!REDIRECT_STATUSES.contains(&300));
        assert!(!REDIRECT_STATUSES.contains(&304));
    }
}
