//! probe_status library: bulk HTTP(S) liveness probing
//!
//! This library probes many hosts concurrently and reports, for each one, the
//! final HTTP status code, the response time, and (over TLS) the certificate
//! expiry and any certificate problem. Bare hosts get a scheme inferred from
//! their port, redirects and retries are handled per target, and every target
//! yields exactly one [`ProbeResult`].
//!
//! # Example
//!
//! ```no_run
//! use probe_status::{classify, ProbeOptions, Runner};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ProbeOptions {
//!     max_concurrency: 100,
//!     max_retries: 1,
//!     ..Default::default()
//! };
//!
//! let runner = Runner::new(options)?;
//! let report = runner
//!     .run_enumeration(["example.com", "e.vinahost.vn:2096"], |result| {
//!         println!("{} {} {}", result.url, result.status_code, classify(&result));
//!     })
//!     .await;
//! println!("{} up, {} down", report.up, report.down);
//! runner.close();
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
mod classify;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod models;
mod run;
mod tls;
mod user_agent;

// Re-export public API
pub use app::{format_result_line, load_targets, print_summary, read_targets, resolve_scheme};
pub use classify::{classify, present_error, Verdict};
pub use config::{LogFormat, LogLevel, Opt, ProbeOptions};
pub use error_handling::{
    ConfigurationError, ErrorType, InfoType, InitializationError, ProbeError, ProcessingStats,
    WarningType,
};
pub use models::{ProbeResult, Target, TlsCertificateInfo};
pub use run::{EnumerationReport, Runner};
