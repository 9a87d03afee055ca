//! Account identifiers and the transfer unit of work.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of id characters shown in status lines.
const SHORT_LEN: usize = 4;

/// Account identifier.
///
/// Backed by a UUID so ids generated by the store (`gen_random_uuid()`) and
/// ids generated in-process are interchangeable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        AccountId(Uuid::new_v4())
    }

    /// Truncated prefix of the id for human-readable output.
    pub fn short(&self) -> String {
        let mut s = self.0.simple().to_string();
        s.truncate(SHORT_LEN);
        s
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        AccountId(id)
    }
}

/// One unit of transfer work: debit `from`, credit `to`, same `amount`.
///
/// Ephemeral; lives for a single loop iteration. Amounts are non-negative
/// integers. There is deliberately no balance-sufficiency rule, so a
/// committed transfer may drive `from` negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Account to debit.
    pub from: AccountId,
    /// Account to credit.
    pub to: AccountId,
    /// Amount moved from `from` to `to`.
    pub amount: i64,
}

impl Transfer {
    /// Create a transfer between two distinct accounts.
    ///
    /// # Panics
    ///
    /// Panics if `from == to` or `amount` is negative. The sampler draws
    /// pairs without replacement, so either is a caller bug.
    pub fn new(from: AccountId, to: AccountId, amount: i64) -> Self {
        assert_ne!(from, to, "transfer endpoints must be distinct accounts");
        assert!(amount >= 0, "transfer amount must be non-negative");
        Self { from, to, amount }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from.short(), self.to.short(), self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_is_a_prefix() {
        let id = AccountId::random();
        let short = id.short();
        assert_eq!(short.len(), 4);
        assert!(id.0.simple().to_string().starts_with(&short));
    }

    #[test]
    fn transfer_between_distinct_accounts() {
        let from = AccountId::random();
        let to = AccountId::random();
        let transfer = Transfer::new(from, to, 42);
        assert_eq!(transfer.from, from);
        assert_eq!(transfer.to, to);
        assert_eq!(transfer.amount, 42);
    }

    #[test]
    #[should_panic(expected = "distinct accounts")]
    fn self_transfer_is_rejected() {
        let id = AccountId::random();
        let _ = Transfer::new(id, id, 1);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_amount_is_rejected() {
        let _ = Transfer::new(AccountId::random(), AccountId::random(), -1);
    }
}
