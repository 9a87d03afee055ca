//! Working set of account ids and pair sampling.
//!
//! The pool is fetched once before the loop starts and is read-only from
//! then on; it is purely the sampling domain.

use ledgerload_types::AccountId;
use rand::seq::index;
use rand::Rng;
use thiserror::Error;

/// Pool of account ids eligible for sampling during the run.
#[derive(Debug, Clone)]
pub struct IdPool {
    ids: Vec<AccountId>,
}

impl IdPool {
    /// Smallest pool that can supply a transfer pair.
    pub const MIN_ACCOUNTS: usize = 2;

    /// Build a pool from fetched ids.
    ///
    /// A pool smaller than [`Self::MIN_ACCOUNTS`] cannot supply a pair and
    /// is a fatal configuration error before the loop starts.
    pub fn new(ids: Vec<AccountId>) -> Result<Self, PoolError> {
        if ids.len() < Self::MIN_ACCOUNTS {
            return Err(PoolError::TooFewAccounts {
                have: ids.len(),
                need: Self::MIN_ACCOUNTS,
            });
        }
        Ok(Self { ids })
    }

    /// Number of ids in the pool.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the pool is empty. Construction guarantees it never is.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Draw `k` distinct ids uniformly at random, without replacement.
    ///
    /// Successive calls are independent; there is no ordering guarantee.
    ///
    /// # Panics
    ///
    /// Panics if `k` exceeds the pool size.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, k: usize) -> Vec<AccountId> {
        assert!(
            k <= self.ids.len(),
            "sample of {k} ids exceeds pool of {}",
            self.ids.len()
        );
        index::sample(rng, self.ids.len(), k)
            .into_iter()
            .map(|i| self.ids[i])
            .collect()
    }

    /// Draw a distinct (from, to) pair.
    pub fn sample_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> (AccountId, AccountId) {
        let pair = self.sample(rng, 2);
        (pair[0], pair[1])
    }
}

/// Errors building the sampling pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The store returned fewer ids than sampling requires.
    #[error("account pool needs at least {need} ids, got {have}")]
    TooFewAccounts {
        /// Ids actually fetched.
        have: usize,
        /// Minimum the sampler requires.
        need: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn pool_of(n: usize) -> IdPool {
        IdPool::new((0..n).map(|_| AccountId::random()).collect()).unwrap()
    }

    #[test]
    fn pairs_are_distinct_and_from_the_pool() {
        let pool = pool_of(5);
        let members: HashSet<AccountId> = pool.sample(&mut ChaCha8Rng::seed_from_u64(0), 5)
            .into_iter()
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let (from, to) = pool.sample_pair(&mut rng);
            assert_ne!(from, to);
            assert!(members.contains(&from));
            assert!(members.contains(&to));
        }
    }

    #[test]
    fn two_element_pool_always_yields_both() {
        let pool = pool_of(2);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let (from, to) = pool.sample_pair(&mut rng);
            assert_ne!(from, to);
        }
    }

    #[test]
    fn undersized_pool_is_rejected() {
        let err = IdPool::new(vec![AccountId::random()]).unwrap_err();
        assert!(matches!(err, PoolError::TooFewAccounts { have: 1, need: 2 }));
        assert!(IdPool::new(Vec::new()).is_err());
    }

    #[test]
    #[should_panic(expected = "exceeds pool")]
    fn oversized_sample_panics() {
        let pool = pool_of(3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let _ = pool.sample(&mut rng, 4);
    }
}
