//! Configuration constants.
//!
//! This module defines the defaults used by `ProbeOptions` and the runner,
//! including timeouts, size limits, retry and redirect budgets.

/// Default per-attempt timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default number of retries after the first failed attempt
/// Set to 3 = initial attempt + 3 retries (4 attempts total per target)
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops and excessive request chains
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Default number of targets probed concurrently (semaphore limit)
pub const DEFAULT_MAX_CONCURRENCY: usize = 50;

/// Progress logging interval in seconds
pub const LOGGING_INTERVAL: u64 = 5;

/// TCP connection timeout in seconds
/// Applied on top of the per-attempt timeout so dead hosts fail fast
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;

// Retry strategy
/// Initial delay in milliseconds before the first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 100;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 5;

// Response and body size limits
/// Default cap on response body bytes read per probe (2MB)
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;
/// Default cap on response body bytes kept in the result
/// Liveness probing does not need the body, so nothing is kept unless asked for
pub const DEFAULT_MAX_RESPONSE_BYTES_TO_SAVE: usize = 0;

/// Default User-Agent string for HTTP requests.
///
/// Used when `randomize_user_agent` is off. Users can override this via the
/// `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default HTTP method used for probing
pub const DEFAULT_METHOD: &str = "GET";
