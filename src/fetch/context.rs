//! Processing context for probe operations.
//!
//! This module defines the `ProcessingContext` struct that groups the shared
//! resources every probe needs, so they travel as one `Arc` into each worker.

use std::sync::Arc;

use crate::config::ProbeOptions;
use crate::error_handling::ProcessingStats;

/// Context containing all shared resources needed to probe a target.
///
/// Everything in here is read-only or internally synchronized, so one
/// instance is shared by all concurrent workers of a session.
#[derive(Clone)]
pub struct ProcessingContext {
    /// HTTP client (redirects disabled, no idle connection reuse)
    pub client: Arc<reqwest::Client>,
    /// Session options, never mutated after the session starts
    pub options: Arc<ProbeOptions>,
    /// Error, warning and info counters
    pub stats: Arc<ProcessingStats>,
}

impl ProcessingContext {
    /// Creates a new `ProcessingContext` with the given resources.
    pub fn new(
        client: Arc<reqwest::Client>,
        options: Arc<ProbeOptions>,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            client,
            options,
            stats,
        }
    }
}
