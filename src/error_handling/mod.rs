//! Error handling and probing statistics.
//!
//! This module provides:
//! - Session errors (`ConfigurationError`, `InitializationError`)
//! - The per-target failure type (`ProbeError`) and its retriability
//! - Categorization of `reqwest` failures and the retry backoff strategy
//! - Statistics counters for errors, warnings, and info events

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_reqwest_error, classify_send_error, get_retry_strategy, update_error_stats,
};
pub use stats::ProcessingStats;
pub use types::{
    ConfigurationError, ErrorType, InfoType, InitializationError, ProbeError, WarningType,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        for warning_type in WarningType::iter() {
            assert_eq!(stats.get_warning_count(warning_type), 0);
        }
        for info_type in InfoType::iter() {
            assert_eq!(stats.get_info_count(info_type), 0);
        }
    }

    #[test]
    fn test_processing_stats_totals() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::HttpRequestTimeoutError);
        stats.increment_error(ErrorType::HttpRequestTimeoutError);
        stats.increment_error(ErrorType::InvalidUrl);
        stats.increment_warning(WarningType::UnparsableTarget);
        stats.increment_info(InfoType::HttpRedirect);

        assert_eq!(stats.get_error_count(ErrorType::HttpRequestTimeoutError), 2);
        assert_eq!(stats.total_errors(), 3);
        assert_eq!(stats.total_warnings(), 1);
        assert_eq!(stats.total_info(), 1);
    }

    #[test]
    fn test_update_error_stats_uses_probe_error_category() {
        let stats = ProcessingStats::new();
        update_error_stats(&stats, &ProbeError::Cancelled);
        assert_eq!(stats.get_error_count(ErrorType::ProbeCancelled), 1);
    }
}
