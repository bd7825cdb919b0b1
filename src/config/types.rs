//! Configuration types and CLI options.
//!
//! This module defines the probing session configuration (`ProbeOptions`),
//! its validation, and the command-line options wrapping it.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, ValueEnum};
use tokio::sync::Semaphore;

use crate::config::constants::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_RESPONSE_BYTES_TO_SAVE, DEFAULT_MAX_RETRIES,
    DEFAULT_METHOD, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_REDIRECT_HOPS,
    MAX_RESPONSE_BODY_SIZE, RETRY_INITIAL_DELAY_MS,
};
use crate::error_handling::ConfigurationError;

/// Methods accepted when `unsafe_mode` is off.
const STANDARD_METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS", "PATCH", "TRACE", "CONNECT",
];

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Configuration snapshot for a probing session.
///
/// Built once, validated with [`ProbeOptions::validate`], then shared read-only
/// (behind an `Arc`) by every concurrent probe. Nothing mutates it after the
/// session starts.
///
/// # Examples
///
/// ```no_run
/// use probe_status::ProbeOptions;
///
/// let options = ProbeOptions {
///     timeout_seconds: 5,
///     max_retries: 1,
///     ..Default::default()
/// };
/// options.validate().expect("valid options");
/// ```
#[derive(Debug, Clone, Args)]
pub struct ProbeOptions {
    /// HTTP methods to probe with, tried in order (comma separated)
    #[arg(long = "method", value_delimiter = ',', default_value = DEFAULT_METHOD)]
    pub methods: Vec<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Retries after a transport failure (per target)
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Do not follow HTTP redirects
    #[arg(long = "no-follow-redirects", action = ArgAction::SetFalse)]
    pub follow_redirects: bool,

    /// Maximum number of redirect hops to follow
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS)]
    pub max_redirects: usize,

    /// Do not record TLS certificate expiry and errors
    #[arg(long = "no-tls-grab", action = ArgAction::SetFalse)]
    pub capture_tls: bool,

    /// Maximum response body bytes kept in each result
    #[arg(long, default_value_t = DEFAULT_MAX_RESPONSE_BYTES_TO_SAVE)]
    pub max_response_bytes_to_save: usize,

    /// Maximum response body bytes read from the network
    #[arg(long, default_value_t = MAX_RESPONSE_BODY_SIZE)]
    pub max_response_bytes_to_read: usize,

    /// Use the fixed --user-agent instead of a random one per attempt
    #[arg(long = "no-random-agent", action = ArgAction::SetFalse)]
    pub randomize_user_agent: bool,

    /// Relax input validation (no URL length limit, any method token)
    #[arg(long = "unsafe")]
    pub unsafe_mode: bool,

    /// HTTP User-Agent header value (used when random agents are disabled)
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Maximum number of targets probed concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Initial retry backoff in milliseconds (doubles on each retry)
    #[arg(long, default_value_t = RETRY_INITIAL_DELAY_MS)]
    pub retry_initial_delay_ms: u64,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            methods: vec![DEFAULT_METHOD.to_string()],
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            follow_redirects: true,
            max_redirects: MAX_REDIRECT_HOPS,
            capture_tls: true,
            max_response_bytes_to_save: DEFAULT_MAX_RESPONSE_BYTES_TO_SAVE,
            max_response_bytes_to_read: MAX_RESPONSE_BODY_SIZE,
            randomize_user_agent: true,
            unsafe_mode: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            retry_initial_delay_ms: RETRY_INITIAL_DELAY_MS,
        }
    }
}

impl ProbeOptions {
    /// Checks the options for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` describing the first problem found:
    /// - no methods, or a method that is not a valid HTTP token
    /// - a non-standard method while `unsafe_mode` is off
    /// - a zero timeout, or a concurrency of zero or above
    ///   `Semaphore::MAX_PERMITS`
    /// - an empty User-Agent while random agents are disabled
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.methods.is_empty() {
            return Err(ConfigurationError::NoMethods);
        }
        for method in &self.methods {
            if reqwest::Method::from_bytes(method.as_bytes()).is_err() {
                return Err(ConfigurationError::InvalidMethod(method.clone()));
            }
            if !self.unsafe_mode && !STANDARD_METHODS.contains(&method.as_str()) {
                return Err(ConfigurationError::NonStandardMethod(method.clone()));
            }
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidTimeout(self.timeout_seconds));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigurationError::InvalidConcurrency(self.max_concurrency));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(ConfigurationError::ConcurrencyTooLarge {
                got: self.max_concurrency,
                max: Semaphore::MAX_PERMITS,
            });
        }
        if !self.randomize_user_agent && self.user_agent.trim().is_empty() {
            return Err(ConfigurationError::EmptyUserAgent);
        }
        Ok(())
    }

    /// Per-attempt deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Command-line options for the `probe_status` binary.
#[derive(Debug, Parser)]
#[command(
    name = "probe_status",
    version,
    about = "Probe hosts over HTTP(S) and report status, latency and TLS expiry"
)]
pub struct Opt {
    /// Targets to probe (host, host:port or URL)
    pub targets: Vec<String>,

    /// File to read targets from, one per line ("-" for stdin)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Print one JSON object per result on stdout
    #[arg(long)]
    pub json: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub probe: ProbeOptions,
}
