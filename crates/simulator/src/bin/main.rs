//! ledgerload CLI
//!
//! Drives a transactional account store with a continuous stream of
//! randomly sampled balance transfers.

use clap::{Parser, Subcommand};
use ledgerload_simulator::{Simulation, SimulationConfig};
use ledgerload_store::AccountStore;
use ledgerload_store_postgres::{PgStore, PgStoreConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "ledgerload")]
#[command(about = "Transfer workload generator for transactional account stores")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset and seed the account table, then exit
    Seed {
        /// Datastore connection string
        #[arg(long)]
        url: String,

        /// Number of accounts to create
        #[arg(long, default_value = "1000")]
        accounts: u32,

        /// Starting balance per account
        #[arg(long, default_value = "10000")]
        balance: f64,
    },

    /// Seed the account table and run the transfer loop until interrupted
    Run {
        /// Datastore connection string
        #[arg(long)]
        url: String,

        /// Number of accounts to seed
        #[arg(long, default_value = "1000")]
        accounts: u32,

        /// Starting balance per account
        #[arg(long, default_value = "10000")]
        balance: f64,

        /// Time between transfers (e.g. "100ms", "1s")
        #[arg(long, default_value = "100ms")]
        tick_interval: humantime::Duration,

        /// Deadline for a single transfer, retries included
        #[arg(long, default_value = "5s")]
        transfer_timeout: humantime::Duration,

        /// Transfer amounts are drawn from [0, max-amount)
        #[arg(long, default_value = "100")]
        max_amount: i64,

        /// Stop after this many ticks instead of running until interrupted
        #[arg(long)]
        ticks: Option<u64>,

        /// Seed the sampling RNG for a deterministic run
        #[arg(long)]
        seed: Option<u64>,

        /// Disable styled output
        #[arg(long)]
        no_color: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed {
            url,
            accounts,
            balance,
        } => {
            let store = PgStore::connect(PgStoreConfig::new(url)).await?;
            store.ping().await?;

            store.ensure_schema().await?;
            store.truncate_accounts().await?;
            let seeded = store.seed_accounts(accounts, balance).await?;
            println!("Seeded {seeded} accounts at balance {balance}.");
        }

        Commands::Run {
            url,
            accounts,
            balance,
            tick_interval,
            transfer_timeout,
            max_amount,
            ticks,
            seed,
            no_color,
        } => {
            let store = Arc::new(PgStore::connect(PgStoreConfig::new(url)).await?);
            store.ping().await?;

            let mut config = SimulationConfig::default()
                .with_accounts(accounts)
                .with_initial_balance(balance)
                .with_tick_interval(*tick_interval)
                .with_transfer_timeout(*transfer_timeout)
                .with_max_amount(max_amount)
                .with_colors(!no_color);
            if let Some(ticks) = ticks {
                config = config.with_max_ticks(ticks);
            }
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }

            let mut simulation = Simulation::new(store, config)?;
            let pool = simulation.prepare().await?;

            let cancel = CancellationToken::new();
            let signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    signal.cancel();
                }
            });

            let report = simulation.run(&pool, cancel).await;
            report.print();
        }
    }

    Ok(())
}
