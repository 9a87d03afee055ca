//! Error taxonomy for store operations.

use ledgerload_types::AccountId;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by account store backends and their callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not guarantee serializable execution; the whole
    /// transaction body is safe to retry.
    #[error("serialization conflict: {0}")]
    Serialization(String),

    /// The operation's deadline elapsed before commit.
    #[error("operation timed out after {budget:?}")]
    Timeout {
        /// The deadline that was exceeded.
        budget: Duration,
    },

    /// The surrounding operation was cancelled by its caller.
    #[error("operation cancelled")]
    Cancelled,

    /// A statement referenced an account id with no row.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// Any other backend failure (connection, constraint, statement).
    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether retrying the whole transaction body may resolve the error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Serialization(_))
    }

    /// Whether the error is a caller-initiated cancellation.
    ///
    /// Cancellations are excluded from failure statistics.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StoreError::Cancelled)
    }
}
