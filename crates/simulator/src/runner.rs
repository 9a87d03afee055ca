//! Simulation lifecycle and the transfer loop.

use crate::accounts::{IdPool, PoolError};
use crate::config::{ConfigError, SimulationConfig};
use crate::executor::TransferExecutor;
use crate::render::StatusFormatter;
use crate::stats::{SimulationReport, SimulationStats};
use crate::workload::TransferWorkload;
use ledgerload_store::{AccountStore, StoreError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors preparing the account table before the loop starts.
///
/// Every variant is fatal to startup; the reset step is the only
/// best-effort part of the lifecycle and never produces one of these.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// Schema preparation failed.
    #[error("preparing schema: {0}")]
    Schema(StoreError),

    /// Bulk seeding failed.
    #[error("seeding accounts: {0}")]
    Seed(StoreError),

    /// The id fetch for the working set failed.
    #[error("fetching account ids: {0}")]
    FetchIds(StoreError),

    /// The fetched working set is too small to sample.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// The transfer simulation: lifecycle plus the tick loop.
pub struct Simulation<S> {
    config: SimulationConfig,
    store: Arc<S>,
    executor: TransferExecutor<S>,
    workload: TransferWorkload,
    formatter: StatusFormatter,
    stats: SimulationStats,
}

impl<S: AccountStore> Simulation<S> {
    /// Create a simulation over `store` with a validated configuration.
    pub fn new(store: Arc<S>, config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let executor = TransferExecutor::new(Arc::clone(&store), config.transfer_timeout);
        let workload = TransferWorkload::new(config.max_amount);
        let formatter = StatusFormatter::new(config.colors);
        Ok(Self {
            config,
            store,
            executor,
            workload,
            formatter,
            stats: SimulationStats::new(),
        })
    }

    /// One-time provisioning before the loop starts.
    ///
    /// Prepares the schema, resets the table best-effort, seeds the
    /// configured number of accounts, and fetches the working set. Apart
    /// from the reset, any failure here is fatal: the loop must not start
    /// without a valid pool.
    pub async fn prepare(&self) -> Result<IdPool, PrepareError> {
        self.store
            .ensure_schema()
            .await
            .map_err(PrepareError::Schema)?;

        if let Err(err) = self.store.truncate_accounts().await {
            warn!(error = %err, "failed to reset account table, continuing");
        }

        let seeded = self
            .store
            .seed_accounts(self.config.accounts, self.config.initial_balance)
            .await
            .map_err(PrepareError::Seed)?;
        info!(
            accounts = seeded,
            initial_balance = self.config.initial_balance,
            "seeded account table"
        );

        let ids = self
            .store
            .account_ids(self.config.accounts)
            .await
            .map_err(PrepareError::FetchIds)?;

        Ok(IdPool::new(ids)?)
    }

    /// Run the loop until `cancel` fires or the configured tick bound is
    /// reached.
    ///
    /// Each tick samples a pair, executes one transfer, folds the outcome
    /// into the statistics, and prints a status line. Failures other than
    /// cancellation are counted and logged but never stop the loop. A slow
    /// iteration makes the next tick fire immediately on return and
    /// re-anchors the schedule; ticks never pile up beyond that.
    pub async fn run(&mut self, pool: &IdPool, cancel: CancellationToken) -> SimulationReport {
        let started = Instant::now();
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut ticker = interval_at(
            started + self.config.tick_interval,
            self.config.tick_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            accounts = pool.len(),
            tick_interval_ms = self.config.tick_interval.as_millis() as u64,
            transfer_timeout_ms = self.config.transfer_timeout.as_millis() as u64,
            "starting transfer loop"
        );

        let mut ticks: u64 = 0;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let transfer = self.workload.next_transfer(pool, &mut rng);
            let (elapsed, result) = self.executor.perform_transfer(&transfer, &cancel).await;

            match result {
                Ok(()) => self.stats.record_success(elapsed),
                Err(err) if err.is_cancelled() => {
                    debug!("transfer cancelled mid-flight");
                }
                Err(err) => {
                    warn!(error = %err, "transfer failed");
                    self.stats.record_failure(elapsed);
                }
            }

            println!(
                "{}",
                self.formatter
                    .status_line(&transfer.from, &transfer.to, elapsed, &self.stats)
            );

            ticks += 1;
            if let Some(limit) = self.config.max_ticks {
                if ticks >= limit {
                    break;
                }
            }
        }

        self.stats.report(started.elapsed())
    }

    /// Run the loop for `duration`, then cancel it.
    pub async fn run_for(&mut self, pool: &IdPool, duration: Duration) -> SimulationReport {
        let cancel = CancellationToken::new();
        let timer = cancel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            timer.cancel();
        });

        self.run(pool, cancel).await
    }

    /// Current running statistics.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }
}
