//! PostgreSQL/CockroachDB [`AccountStore`] backend.
//!
//! A thin `sqlx` adapter: one pool, five statements, and the SQLSTATE
//! classification that turns serialization failures into retryable errors.
//! All SQL lives in this crate; callers only see the trait.
//!
//! [`AccountStore`]: ledgerload_store::AccountStore

mod store;

pub use store::{PgStore, PgStoreConfig};
