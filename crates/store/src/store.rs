//! The account store contract.

use crate::StoreError;
use async_trait::async_trait;
use ledgerload_types::{AccountId, Transfer};
use std::fmt;

/// Transaction isolation level requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// As-if-serial execution; conflicting transactions fail retryably.
    #[default]
    Serializable,
    /// Snapshot-style isolation.
    RepeatableRead,
    /// Statement-level read consistency.
    ReadCommitted,
}

impl IsolationLevel {
    /// SQL spelling of the level.
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::Serializable => "SERIALIZABLE",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A transactional table of accounts with a numeric balance.
///
/// Mutations become visible only after successful commit. Implementations
/// must distinguish retryable serialization conflicts
/// ([`StoreError::Serialization`]) from other failures.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Prepare the backing schema. Idempotent.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Remove every account row. Safe to call on an empty table.
    async fn truncate_accounts(&self) -> Result<(), StoreError>;

    /// Bulk-insert `count` accounts, each starting at `initial_balance`.
    ///
    /// Returns the number of rows inserted.
    async fn seed_accounts(&self, count: u32, initial_balance: f64) -> Result<u64, StoreError>;

    /// Fetch up to `limit` account ids, in no particular order.
    async fn account_ids(&self, limit: u32) -> Result<Vec<AccountId>, StoreError>;

    /// One attempt at the atomic two-row debit/credit.
    ///
    /// The debit and credit are applied in a single transaction at
    /// `isolation`, scoped to exactly the two target rows, with no separate
    /// read-then-write step. Conflicts surface as
    /// [`StoreError::Serialization`]; callers decide whether to retry.
    async fn apply_transfer(
        &self,
        transfer: &Transfer,
        isolation: IsolationLevel,
    ) -> Result<(), StoreError>;

    /// Balance of a single account.
    async fn balance(&self, id: AccountId) -> Result<f64, StoreError>;

    /// Sum of all balances. Conservation checks in tests rely on this.
    async fn total_balance(&self) -> Result<f64, StoreError>;
}
