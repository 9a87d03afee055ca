//! ledgerload Simulator
//!
//! A continuous transfer workload for transactional account stores.
//! Repeatedly samples two accounts, moves a random amount between them in a
//! serializable transaction with deadline-bounded conflict retry, and
//! reports per-transfer latency plus cumulative error/downtime figures.
//!
//! # Architecture
//!
//! The simulator builds on the `ledgerload-store` abstraction to provide:
//!
//! - **Working Set**: account ids fetched once at startup, sampled per tick
//! - **Transfer Execution**: one serializable transfer per tick, retried on
//!   conflict within a fixed deadline
//! - **Statistics**: error count, accumulated downtime, latency percentiles
//! - **Lifecycle**: best-effort reset plus fatal-on-failure seeding before
//!   the loop starts
//!
//! # Example
//!
//! ```ignore
//! use ledgerload_simulator::{Simulation, SimulationConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = SimulationConfig::default()
//!     .with_accounts(1000)
//!     .with_initial_balance(10_000.0);
//!
//! let mut simulation = Simulation::new(store, config)?;
//! let pool = simulation.prepare().await?;
//! let report = simulation.run(&pool, CancellationToken::new()).await;
//!
//! report.print();
//! ```

pub mod accounts;
pub mod config;
pub mod executor;
pub mod render;
pub mod runner;
pub mod stats;
pub mod workload;

pub use accounts::{IdPool, PoolError};
pub use config::{ConfigError, SimulationConfig};
pub use executor::TransferExecutor;
pub use render::StatusFormatter;
pub use runner::{PrepareError, Simulation};
pub use stats::{SimulationReport, SimulationStats};
pub use workload::TransferWorkload;
