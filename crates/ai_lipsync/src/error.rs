//! Lip-sync setup errors
//!
//! Only construction can fail with an error; the outcome of a run is a
//! [`LipSyncOutcome`](crate::LipSyncOutcome).

use thiserror::Error;

/// Errors raised while setting up the invoker
#[derive(Debug, Error)]
pub enum LipSyncError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}
