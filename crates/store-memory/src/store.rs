//! Mutex-guarded map of balances with a scripted fault queue.

use async_trait::async_trait;
use ledgerload_store::{AccountStore, IsolationLevel, StoreError};
use ledgerload_types::{AccountId, Transfer};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Scripted outcome for an upcoming transfer attempt.
///
/// Faults are consumed one per [`AccountStore::apply_transfer`] call, in
/// injection order. Once the queue is empty, attempts behave normally.
#[derive(Debug, Clone)]
pub enum Fault {
    /// Report a retryable serialization conflict.
    SerializationConflict,
    /// Stall the attempt before applying it, then succeed.
    Stall(Duration),
    /// Report a non-retryable backend failure.
    Failure(String),
}

/// In-memory account store.
///
/// Each mutation happens under a single lock acquisition, so transfers are
/// atomic and the conservation invariant holds under concurrent callers.
/// Every attempt is counted, letting tests observe retry transparency.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<AccountId, f64>>,
    faults: Mutex<VecDeque<Fault>>,
    transfer_attempts: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fault for an upcoming transfer attempt.
    pub fn inject_fault(&self, fault: Fault) {
        self.faults.lock().push_back(fault);
    }

    /// Total number of transfer attempts observed, including faulted ones.
    pub fn transfer_attempts(&self) -> u64 {
        self.transfer_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn truncate_accounts(&self) -> Result<(), StoreError> {
        self.accounts.lock().clear();
        Ok(())
    }

    async fn seed_accounts(&self, count: u32, initial_balance: f64) -> Result<u64, StoreError> {
        let mut accounts = self.accounts.lock();
        for _ in 0..count {
            accounts.insert(AccountId::random(), initial_balance);
        }
        Ok(count as u64)
    }

    async fn account_ids(&self, limit: u32) -> Result<Vec<AccountId>, StoreError> {
        let mut ids: Vec<AccountId> = self.accounts.lock().keys().copied().collect();
        ids.shuffle(&mut rand::thread_rng());
        ids.truncate(limit as usize);
        Ok(ids)
    }

    async fn apply_transfer(
        &self,
        transfer: &Transfer,
        _isolation: IsolationLevel,
    ) -> Result<(), StoreError> {
        self.transfer_attempts.fetch_add(1, Ordering::SeqCst);

        let fault = self.faults.lock().pop_front();
        match fault {
            Some(Fault::SerializationConflict) => {
                return Err(StoreError::Serialization("injected write conflict".into()));
            }
            Some(Fault::Failure(message)) => return Err(StoreError::Backend(message)),
            Some(Fault::Stall(delay)) => tokio::time::sleep(delay).await,
            None => {}
        }

        let mut accounts = self.accounts.lock();
        if !accounts.contains_key(&transfer.to) {
            return Err(StoreError::AccountNotFound(transfer.to));
        }
        match accounts.get_mut(&transfer.from) {
            None => return Err(StoreError::AccountNotFound(transfer.from)),
            Some(balance) => *balance -= transfer.amount as f64,
        }
        if let Some(balance) = accounts.get_mut(&transfer.to) {
            *balance += transfer.amount as f64;
        }
        Ok(())
    }

    async fn balance(&self, id: AccountId) -> Result<f64, StoreError> {
        self.accounts
            .lock()
            .get(&id)
            .copied()
            .ok_or(StoreError::AccountNotFound(id))
    }

    async fn total_balance(&self) -> Result<f64, StoreError> {
        Ok(self.accounts.lock().values().sum())
    }
}
