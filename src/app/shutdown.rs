//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Shuts down background tasks gracefully.
///
/// Cancels `cancel` and waits for the logging task to notice it, so no
/// progress line is printed after the final summary.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    logging_task: Option<tokio::task::JoinHandle<()>>,
) {
    // Signal logging task to stop and await it
    cancel.cancel();
    if let Some(logging_task) = logging_task {
        let _ = logging_task.await;
    }
}
