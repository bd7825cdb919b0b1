//! Bulk enumeration over many targets.
//!
//! Targets are normalized in input order and probed concurrently, bounded by
//! a semaphore. Workers push finished results into a completion queue that is
//! drained by the task that called [`Runner::run_enumeration`], so the sink is
//! only ever called from that one task and needs neither `Send` nor `Sync`.

mod task;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::app::statistics::print_error_statistics;
use crate::app::{log_progress, shutdown_gracefully};
use crate::classify::{classify, Verdict};
use crate::config::{ProbeOptions, LOGGING_INTERVAL};
use crate::error_handling::{
    update_error_stats, InitializationError, ProbeError, ProcessingStats, WarningType,
};
use crate::fetch::ProcessingContext;
use crate::initialization::{init_client, init_crypto_provider, init_semaphore};
use crate::models::{ProbeResult, Target};

use task::{process_target_task, TargetTaskParams};

/// Summary of a completed enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationReport {
    /// Number of targets supplied (and results delivered)
    pub total: usize,
    /// Results classified `Up`
    pub up: usize,
    /// Results classified `Down`, failures included
    pub down: usize,
    /// Results with no response at all
    pub failed: usize,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// A probing session: validated options plus the shared HTTP client.
///
/// # Example
///
/// ```no_run
/// use probe_status::{ProbeOptions, Runner};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let runner = Runner::new(ProbeOptions::default())?;
/// let report = runner
///     .run_enumeration(["example.com", "example.org:8080"], |result| {
///         println!("{} -> {}", result.input, result.status_code);
///     })
///     .await;
/// println!("{} up, {} down", report.up, report.down);
/// runner.close();
/// # Ok(())
/// # }
/// ```
pub struct Runner {
    ctx: Arc<ProcessingContext>,
    cancel: CancellationToken,
}

impl Runner {
    /// Validates `options` and builds the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::ConfigurationError` for invalid options
    /// and `InitializationError::HttpClientError` if the client cannot be built.
    pub fn new(options: ProbeOptions) -> Result<Self, InitializationError> {
        options.validate()?;
        init_crypto_provider();
        let client = init_client(&options)?;
        let ctx = ProcessingContext::new(
            client,
            Arc::new(options),
            Arc::new(ProcessingStats::new()),
        );
        Ok(Self {
            ctx: Arc::new(ctx),
            cancel: CancellationToken::new(),
        })
    }

    /// Token that cancels the session. Cancelling it makes every target that
    /// has not finished yet produce a `Cancelled` result.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.ctx.options
    }

    /// Error, warning and info counters accumulated by this session.
    pub fn stats(&self) -> &ProcessingStats {
        &self.ctx.stats
    }

    /// Probes every target and delivers exactly one result per target to
    /// `sink`, in completion order.
    ///
    /// Returns once every target has a result. Per-target failures never
    /// abort the enumeration; they show up in the results and the report.
    pub async fn run_enumeration<I, F>(&self, targets: I, mut sink: F) -> EnumerationReport
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: FnMut(ProbeResult),
    {
        let start_time = Instant::now();
        let targets: Vec<Target> = targets
            .into_iter()
            .map(|raw| {
                let target = Target::new(raw);
                if !target.is_schemed() {
                    self.ctx.stats.increment_warning(WarningType::UnparsableTarget);
                }
                target
            })
            .collect();
        let total = targets.len();
        info!(
            "Probing {total} target{} with up to {} workers",
            if total == 1 { "" } else { "s" },
            self.ctx.options.max_concurrency
        );

        let (results_tx, mut results_rx) = mpsc::unbounded_channel();
        let producer = tokio::spawn(dispatch_targets(
            targets,
            Arc::clone(&self.ctx),
            self.cancel.clone(),
            init_semaphore(self.ctx.options.max_concurrency),
            results_tx,
        ));

        let completed = Arc::new(AtomicUsize::new(0));
        let progress_cancel = CancellationToken::new();
        let logging_task = {
            let completed = Arc::clone(&completed);
            let progress_cancel = progress_cancel.clone();
            tokio::task::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
                // The first tick fires immediately
                interval.tick().await;
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            log_progress(start_time, &completed, total);
                        }
                        _ = progress_cancel.cancelled() => {
                            break;
                        }
                    }
                }
            })
        };

        let mut up = 0;
        let mut down = 0;
        let mut failed = 0;
        while let Some(result) = results_rx.recv().await {
            completed.fetch_add(1, Ordering::SeqCst);
            match classify(&result) {
                Verdict::Up => up += 1,
                Verdict::Down => down += 1,
            }
            if !result.is_success() {
                failed += 1;
            }
            sink(result);
        }

        if let Err(join_error) = producer.await {
            error!("Target dispatcher failed: {join_error}");
        }
        shutdown_gracefully(progress_cancel, Some(logging_task)).await;

        let delivered = completed.load(Ordering::SeqCst);
        if delivered != total {
            warn!("Delivered {delivered} results for {total} targets");
        }
        log_progress(start_time, &completed, total);
        print_error_statistics(&self.ctx.stats);

        EnumerationReport {
            total,
            up,
            down,
            failed,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        }
    }

    /// Ends the session and releases the HTTP client.
    pub fn close(self) {
        debug!("Closing probe session");
        drop(self);
    }
}

/// Spawns one worker per target as permits become available.
///
/// Once the session is cancelled no more workers start; each remaining target
/// gets a `Cancelled` result directly.
async fn dispatch_targets(
    targets: Vec<Target>,
    ctx: Arc<ProcessingContext>,
    cancel: CancellationToken,
    semaphore: Arc<Semaphore>,
    results: mpsc::UnboundedSender<ProbeResult>,
) {
    for target in targets {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
        };
        let Some(permit) = permit else {
            let method = ctx.options.methods.first().map(String::as_str).unwrap_or("GET");
            let err = ProbeError::Cancelled;
            update_error_stats(&ctx.stats, &err);
            let _ = results.send(ProbeResult::failed(&target, method, Duration::ZERO, err));
            continue;
        };

        tokio::spawn(process_target_task(TargetTaskParams {
            target,
            ctx: Arc::clone(&ctx),
            cancel: cancel.clone(),
            permit,
            results: results.clone(),
        }));
    }
}
