//! Session options are rejected before any probing starts.

use probe_status::{ConfigurationError, InitializationError, ProbeOptions, Runner};

#[test]
fn test_default_options_are_valid() {
    assert!(ProbeOptions::default().validate().is_ok());
}

#[test]
fn test_invalid_options_fail_runner_creation() {
    let cases = [
        (
            ProbeOptions {
                methods: Vec::new(),
                ..Default::default()
            },
            ConfigurationError::NoMethods,
        ),
        (
            ProbeOptions {
                timeout_seconds: 0,
                ..Default::default()
            },
            ConfigurationError::InvalidTimeout(0),
        ),
        (
            ProbeOptions {
                max_concurrency: 0,
                ..Default::default()
            },
            ConfigurationError::InvalidConcurrency(0),
        ),
        (
            ProbeOptions {
                max_concurrency: usize::MAX,
                ..Default::default()
            },
            ConfigurationError::ConcurrencyTooLarge {
                got: usize::MAX,
                max: tokio::sync::Semaphore::MAX_PERMITS,
            },
        ),
        (
            ProbeOptions {
                methods: vec!["PURGE".to_string()],
                ..Default::default()
            },
            ConfigurationError::NonStandardMethod("PURGE".to_string()),
        ),
    ];

    for (options, expected) in cases {
        match Runner::new(options) {
            Err(InitializationError::ConfigurationError(e)) => assert_eq!(e, expected),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("options should be rejected: {expected}"),
        }
    }
}

#[test]
fn test_unsafe_mode_allows_custom_methods() {
    let options = ProbeOptions {
        methods: vec!["PURGE".to_string()],
        unsafe_mode: true,
        ..Default::default()
    };
    assert!(options.validate().is_ok());
}
