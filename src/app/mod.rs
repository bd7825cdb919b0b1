//! Main application modules.
//!
//! This module provides target normalization and URL validation, target
//! input, progress logging, shutdown handling, and statistics printing.

pub mod input;
pub mod logging;
pub mod shutdown;
pub mod statistics;
pub mod url;

// Re-export public API
pub use input::{load_targets, read_targets};
pub use logging::{format_result_line, log_progress};
pub use shutdown::shutdown_gracefully;
pub use statistics::{print_error_statistics, print_summary};
pub use url::{resolve_location, resolve_scheme, validate_target_url};
