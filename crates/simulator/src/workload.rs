//! Transfer workload generation.

use crate::accounts::IdPool;
use ledgerload_types::Transfer;
use rand::Rng;

/// Generates the next transfer to attempt: a distinct account pair plus a
/// pseudo-random amount.
#[derive(Debug, Clone)]
pub struct TransferWorkload {
    /// Amounts are drawn from `[0, max_amount)`.
    max_amount: i64,
}

impl TransferWorkload {
    /// Create a workload with the given exclusive amount bound.
    pub fn new(max_amount: i64) -> Self {
        assert!(max_amount > 0, "amount range [0, {max_amount}) is empty");
        Self { max_amount }
    }

    /// Sample a pair from the pool and an amount for the next tick.
    pub fn next_transfer<R: Rng + ?Sized>(&self, pool: &IdPool, rng: &mut R) -> Transfer {
        let (from, to) = pool.sample_pair(rng);
        let amount = rng.gen_range(0..self.max_amount);
        Transfer::new(from, to, amount)
    }
}
