//! Probing statistics tracking.
//!
//! Thread-safe counters for errors, warnings, and informational events
//! observed while probing targets.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType, WarningType};

/// Thread-safe probing statistics tracker.
///
/// Every category is pre-populated with a zeroed atomic counter, so workers
/// only ever touch existing entries and no locking is needed. Share it across
/// tasks with `Arc`.
pub struct ProcessingStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    warnings: HashMap<WarningType, AtomicUsize>,
    info: HashMap<InfoType, AtomicUsize>,
}

fn zeroed<T: IntoEnumIterator + Eq + Hash>() -> HashMap<T, AtomicUsize> {
    T::iter().map(|key| (key, AtomicUsize::new(0))).collect()
}

fn bump<T: Eq + Hash + std::fmt::Debug>(map: &HashMap<T, AtomicUsize>, key: T) {
    match map.get(&key) {
        Some(counter) => {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        None => log::error!("No counter for {:?}; ProcessingStats was not fully initialized", key),
    }
}

fn read<T: Eq + Hash>(map: &HashMap<T, AtomicUsize>, key: T) -> usize {
    map.get(&key).map(|c| c.load(Ordering::SeqCst)).unwrap_or(0)
}

impl ProcessingStats {
    pub fn new() -> Self {
        ProcessingStats {
            errors: zeroed(),
            warnings: zeroed(),
            info: zeroed(),
        }
    }

    pub fn increment_error(&self, error: ErrorType) {
        bump(&self.errors, error);
    }

    pub fn increment_warning(&self, warning: WarningType) {
        bump(&self.warnings, warning);
    }

    pub fn increment_info(&self, info_type: InfoType) {
        bump(&self.info, info_type);
    }

    pub fn get_error_count(&self, error: ErrorType) -> usize {
        read(&self.errors, error)
    }

    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        read(&self.warnings, warning)
    }

    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        read(&self.info, info_type)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }

    /// Get total warning count across all warning types.
    pub fn total_warnings(&self) -> usize {
        WarningType::iter().map(|w| self.get_warning_count(w)).sum()
    }

    /// Get total info count across all info types.
    pub fn total_info(&self) -> usize {
        InfoType::iter().map(|i| self.get_info_count(i)).sum()
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
