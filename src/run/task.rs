//! Per-target task processing.
//!
//! This module contains the body of the Tokio task spawned for each target:
//! run the controller, turn a panic into a failed result, and hand the result
//! to the dispatcher.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use log::error;
use tokio::sync::{mpsc, OwnedSemaphorePermit};
use tokio_util::sync::CancellationToken;

use crate::error_handling::{update_error_stats, ProbeError};
use crate::fetch::{run_target, ProcessingContext};
use crate::models::{ProbeResult, Target};

/// Everything a worker needs for one target.
pub(super) struct TargetTaskParams {
    pub target: Target,
    pub ctx: Arc<ProcessingContext>,
    pub cancel: CancellationToken,
    pub permit: OwnedSemaphorePermit,
    pub results: mpsc::UnboundedSender<ProbeResult>,
}

/// Probes one target and sends exactly one result.
pub(super) async fn process_target_task(params: TargetTaskParams) {
    let TargetTaskParams {
        target,
        ctx,
        cancel,
        permit: _permit, // Hold permit until task completes
        results,
    } = params;

    let start = Instant::now();
    let outcome = AssertUnwindSafe(run_target(&ctx, &target, &cancel))
        .catch_unwind()
        .await;

    let result = match outcome {
        Ok(result) => result,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("Worker for {} panicked: {message}", target.input);
            let err = ProbeError::WorkerPanicked(message);
            update_error_stats(&ctx.stats, &err);
            let method = ctx.options.methods.first().map(String::as_str).unwrap_or("GET");
            ProbeResult::failed(&target, method, start.elapsed(), err)
        }
    };

    // The dispatcher only goes away once every sender is dropped
    let _ = results.send(result);
}

/// Best-effort text of a panic payload.
pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
