//! In-memory [`AccountStore`] backend.
//!
//! Backs the trait with a mutex-guarded map so every mutation is atomic,
//! and adds a scripted fault queue so tests can exercise conflict retry,
//! timeouts, and non-retryable failures without a live database.
//!
//! [`AccountStore`]: ledgerload_store::AccountStore

mod store;

pub use store::{Fault, MemoryStore};
