//! Reconciler error types

use thiserror::Error;

/// Reconciliation and apply errors
#[derive(Error, Debug)]
pub enum NicError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Observed state changed since last read: {0}")]
    Conflict(String),

    #[error("Transient API failure: {0}")]
    TransientApi(String),

    #[error("Invalid NIC description: {0}")]
    InvalidSpec(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NicError {
    /// Whether the caller may retry the failed call with backoff.
    ///
    /// `Conflict` is deliberately not retryable here: the caller must
    /// re-fetch observed state before trying again.
    pub fn is_transient(&self) -> bool {
        matches!(self, NicError::TransientApi(_))
    }
}

pub type Result<T> = std::result::Result<T, NicError>;
