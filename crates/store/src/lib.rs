//! Account store abstraction for ledgerload.
//!
//! This crate defines the contract between the simulation core and whatever
//! datastore holds the account table, along with the shared error taxonomy
//! and the deadline-bounded conflict-retry wrapper.
//!
//! # Design
//!
//! The store is an implementation detail of runners, not of the simulation
//! loop. The loop talks to an [`AccountStore`] trait object and never sees
//! SQL or connection handles:
//!
//! - `ledgerload-store-postgres` backs the trait with a `sqlx` pool
//! - `ledgerload-store-memory` backs it with a mutex-guarded map plus
//!   scripted fault injection for tests
//!
//! A backend performs exactly one transaction attempt per
//! [`AccountStore::apply_transfer`] call and reports conflicts as
//! [`StoreError::Serialization`]. Retrying the whole transaction body under
//! a deadline is the caller's job via [`retry::execute_with_retry`], so the
//! retry policy lives in one place regardless of backend.

mod error;
pub mod retry;
mod store;

pub use error::StoreError;
pub use retry::execute_with_retry;
pub use store::{AccountStore, IsolationLevel};
