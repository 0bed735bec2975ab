//! Logging bootstrap.
//!
//! Initializes a `tracing` subscriber writing human-readable events to
//! stderr, filtered through `RUST_LOG` (default `info`). Output stays on
//! stderr so the rendered cluster tree on stdout remains pipeable.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// An error raised while initializing logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    SetGlobal(String),
}

/// Installs the global tracing subscriber.
///
/// # Errors
/// Returns [`LoggingError::SetGlobal`] when a subscriber is already set.
pub fn init_logging() -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| LoggingError::SetGlobal(err.to_string()))
}
