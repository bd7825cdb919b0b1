//! Session configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, retry budgets)
//! - `ProbeOptions`, the immutable per-session configuration, and its validation
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, Opt, ProbeOptions};
