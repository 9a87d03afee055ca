//! Single-transfer execution with a deadline and conflict retry.

use ledgerload_store::{execute_with_retry, AccountStore, IsolationLevel, StoreError};
use ledgerload_types::Transfer;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Executes transfers against the store one at a time.
///
/// Each call runs the atomic debit/credit at serializable isolation,
/// retrying the whole transaction on conflict, all within a fixed deadline.
pub struct TransferExecutor<S> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S: AccountStore> TransferExecutor<S> {
    /// Create an executor with the given per-transfer deadline.
    pub fn new(store: Arc<S>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Execute one transfer to completion, timeout, or cancellation.
    ///
    /// The elapsed wall time is returned unconditionally, success or
    /// failure, so callers can attribute failure latency as downtime.
    /// Conflict retries are transparent: they extend the elapsed time but
    /// are not separate attempts from the caller's point of view. If
    /// `cancel` fires first the result is [`StoreError::Cancelled`], which
    /// callers exclude from failure statistics.
    pub async fn perform_transfer(
        &self,
        transfer: &Transfer,
        cancel: &CancellationToken,
    ) -> (Duration, Result<(), StoreError>) {
        let started = Instant::now();
        let store = self.store.as_ref();

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(StoreError::Cancelled),
            result = execute_with_retry(self.timeout, move || {
                store.apply_transfer(transfer, IsolationLevel::Serializable)
            }) => result,
        };

        (started.elapsed(), result)
    }
}
