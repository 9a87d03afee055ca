//! Deadline-bounded retry of conflicting transactions.

use crate::StoreError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Pause between attempts. Counts against the caller's budget like
/// everything else.
const RETRY_PAUSE: Duration = Duration::from_millis(10);

/// Run `op` to completion, re-running the entire transaction body while it
/// fails retryably, all within `budget`.
///
/// `op` is expected to perform one full transaction attempt per call (see
/// [`crate::AccountStore::apply_transfer`]). Non-retryable errors propagate
/// immediately. If the budget elapses first, the in-flight attempt is
/// dropped and [`StoreError::Timeout`] is returned; retries that never
/// resolve therefore also manifest as a timeout.
pub async fn execute_with_retry<T, F, Fut>(budget: Duration, mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let attempts = async {
        let mut attempt: u32 = 1;
        loop {
            match op().await {
                Err(err) if err.is_retryable() => {
                    debug!(attempt, error = %err, "retrying conflicting transaction");
                    attempt += 1;
                    tokio::time::sleep(RETRY_PAUSE).await;
                }
                other => break other,
            }
        }
    };

    match tokio::time::timeout(budget, attempts).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout { budget }),
    }
}
