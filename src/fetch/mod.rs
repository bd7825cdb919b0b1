//! Probing a single target over HTTP(S).
//!
//! - `request`: one attempt, no redirects (`execute`)
//! - `controller`: retries and redirects around it (`run_target`)
//! - `context`: the shared resources both need

mod context;
mod controller;
mod request;

pub use context::ProcessingContext;
pub use controller::run_target;
pub use request::{execute, ProbeOutcome};

#[cfg(test)]
mod tests;
