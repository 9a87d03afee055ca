//! Core types for the ledgerload workload generator.
//!
//! Shared domain vocabulary: account identifiers and the transfer unit of
//! work that the executor carries through a transaction.

mod account;

pub use account::{AccountId, Transfer};
