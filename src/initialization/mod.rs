//! Session resource setup.
//!
//! This module provides functions to initialize the shared resources of a
//! probing session:
//! - The HTTP client
//! - The worker-pool semaphore
//! - The rustls crypto provider
//! - The logger (used by the binary)

mod client;
mod logger;

use std::sync::Arc;

use rustls::crypto::{ring::default_provider, CryptoProvider};
use tokio::sync::Semaphore;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes a semaphore bounding the number of targets probed at once.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}

/// Installs the process-wide crypto provider for `rustls`.
///
/// Must run before the first TLS connection. Calling it again is harmless.
pub fn init_crypto_provider() {
    let _ = CryptoProvider::install_default(default_provider());
}
