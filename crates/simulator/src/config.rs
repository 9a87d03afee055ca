//! Configuration types for the simulation.

use std::time::Duration;
use thiserror::Error;

/// Configuration for a simulation run.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Number of accounts to seed.
    pub accounts: u32,

    /// Starting balance for each account.
    pub initial_balance: f64,

    /// Time between transfer ticks.
    pub tick_interval: Duration,

    /// Deadline for a single transfer, retries included.
    pub transfer_timeout: Duration,

    /// Transfer amounts are drawn uniformly from `[0, max_amount)`.
    pub max_amount: i64,

    /// Stop after this many ticks. `None` runs until cancelled.
    pub max_ticks: Option<u64>,

    /// Seed for deterministic sampling. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Style the status line figures.
    pub colors: bool,
}

impl SimulationConfig {
    /// Set the number of accounts to seed.
    pub fn with_accounts(mut self, accounts: u32) -> Self {
        self.accounts = accounts;
        self
    }

    /// Set the starting balance per account.
    pub fn with_initial_balance(mut self, balance: f64) -> Self {
        self.initial_balance = balance;
        self
    }

    /// Set the time between transfer ticks.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the per-transfer deadline.
    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = timeout;
        self
    }

    /// Set the exclusive upper bound for transfer amounts.
    pub fn with_max_amount(mut self, max_amount: i64) -> Self {
        self.max_amount = max_amount;
        self
    }

    /// Bound the run to a fixed number of ticks.
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Seed the sampling RNG for a deterministic run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable styled output.
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Check the configuration for values the loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accounts < 2 {
            return Err(ConfigError::TooFewAccounts(self.accounts));
        }
        if self.max_amount < 1 {
            return Err(ConfigError::EmptyAmountRange(self.max_amount));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.transfer_timeout.is_zero() {
            return Err(ConfigError::ZeroTransferTimeout);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            accounts: 1000,
            initial_balance: 10_000.0,
            tick_interval: Duration::from_millis(100),
            transfer_timeout: Duration::from_secs(5),
            max_amount: 100,
            max_ticks: None,
            seed: None,
            colors: true,
        }
    }
}

/// Configuration values the simulation refuses to start with.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sampling a pair needs at least two accounts.
    #[error("need at least 2 accounts to sample transfer pairs, got {0}")]
    TooFewAccounts(u32),

    /// The amount range `[0, max_amount)` is empty.
    #[error("max amount must be positive, got {0}")]
    EmptyAmountRange(i64),

    /// A zero tick interval would spin the loop.
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,

    /// A zero deadline would fail every transfer.
    #[error("transfer timeout must be non-zero")]
    ZeroTransferTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.accounts, 1000);
        assert_eq!(config.initial_balance, 10_000.0);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.transfer_timeout, Duration::from_secs(5));
        assert_eq!(config.max_amount, 100);
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let too_few = SimulationConfig::default().with_accounts(1);
        assert!(matches!(too_few.validate(), Err(ConfigError::TooFewAccounts(1))));

        let no_amounts = SimulationConfig::default().with_max_amount(0);
        assert!(matches!(no_amounts.validate(), Err(ConfigError::EmptyAmountRange(0))));

        let spinning = SimulationConfig::default().with_tick_interval(Duration::ZERO);
        assert!(matches!(spinning.validate(), Err(ConfigError::ZeroTickInterval)));

        let hopeless = SimulationConfig::default().with_transfer_timeout(Duration::ZERO);
        assert!(matches!(hopeless.validate(), Err(ConfigError::ZeroTransferTimeout)));
    }
}
