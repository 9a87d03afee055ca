//! End-to-end simulation scenarios against the in-memory store.

use ledgerload_simulator::{Simulation, SimulationConfig};
use ledgerload_store::AccountStore;
use ledgerload_store_memory::{Fault, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn config(accounts: u32, ticks: u64) -> SimulationConfig {
    SimulationConfig::default()
        .with_accounts(accounts)
        .with_initial_balance(100.0)
        .with_tick_interval(Duration::from_millis(10))
        .with_transfer_timeout(Duration::from_millis(500))
        .with_max_amount(100)
        .with_max_ticks(ticks)
        .with_seed(7)
        .with_colors(false)
}

#[tokio::test(start_paused = true)]
async fn fifty_ticks_conserve_the_ledger() {
    let store = Arc::new(MemoryStore::new());
    let mut simulation = Simulation::new(Arc::clone(&store), config(5, 50)).unwrap();

    let pool = simulation.prepare().await.unwrap();
    assert_eq!(pool.len(), 5);
    assert_eq!(store.total_balance().await.unwrap(), 500.0);

    let report = simulation.run(&pool, CancellationToken::new()).await;

    assert_eq!(report.transfers, 50);
    assert_eq!(report.errors, 0);
    assert_eq!(report.total_downtime, Duration::ZERO);
    assert_eq!(store.total_balance().await.unwrap(), 500.0);
}

#[tokio::test(start_paused = true)]
async fn conflicts_resolve_transparently() {
    let store = Arc::new(MemoryStore::new());
    let mut simulation = Simulation::new(Arc::clone(&store), config(2, 5)).unwrap();
    let pool = simulation.prepare().await.unwrap();

    store.inject_fault(Fault::SerializationConflict);
    store.inject_fault(Fault::SerializationConflict);

    let report = simulation.run(&pool, CancellationToken::new()).await;

    // Retries happened under the hood but no tick failed.
    assert_eq!(report.transfers, 5);
    assert_eq!(report.errors, 0);
    assert_eq!(store.transfer_attempts(), 7);
    assert_eq!(store.total_balance().await.unwrap(), 200.0);
}

#[tokio::test(start_paused = true)]
async fn failures_are_counted_once_per_tick() {
    let store = Arc::new(MemoryStore::new());
    let mut simulation = Simulation::new(Arc::clone(&store), config(3, 10)).unwrap();
    let pool = simulation.prepare().await.unwrap();

    for _ in 0..3 {
        store.inject_fault(Fault::Failure("node unavailable".into()));
    }

    let report = simulation.run(&pool, CancellationToken::new()).await;

    assert_eq!(report.transfers, 10);
    assert_eq!(report.errors, 3);
    // Failed transfers never touched the balances.
    assert_eq!(store.total_balance().await.unwrap(), 300.0);
}

#[tokio::test(start_paused = true)]
async fn stalled_transfers_time_out_and_count_as_downtime() {
    let store = Arc::new(MemoryStore::new());
    let mut simulation = Simulation::new(Arc::clone(&store), config(2, 3)).unwrap();
    let pool = simulation.prepare().await.unwrap();

    store.inject_fault(Fault::Stall(Duration::from_secs(60)));

    let report = simulation.run(&pool, CancellationToken::new()).await;

    assert_eq!(report.transfers, 3);
    assert_eq!(report.errors, 1);
    // The timed-out transfer's latency is attributed as downtime.
    assert!(report.total_downtime >= Duration::from_millis(500));
    assert!(report.total_downtime < Duration::from_secs(60));
    assert_eq!(store.total_balance().await.unwrap(), 200.0);
}

#[tokio::test(start_paused = true)]
async fn run_for_stops_on_cancellation() {
    let store = Arc::new(MemoryStore::new());
    let unbounded = SimulationConfig::default()
        .with_accounts(4)
        .with_initial_balance(100.0)
        .with_tick_interval(Duration::from_millis(100))
        .with_seed(11)
        .with_colors(false);
    let mut simulation = Simulation::new(Arc::clone(&store), unbounded).unwrap();
    let pool = simulation.prepare().await.unwrap();

    let report = simulation.run_for(&pool, Duration::from_secs(1)).await;

    // Roughly one transfer per tick until the cancellation lands.
    assert!(report.transfers >= 5);
    assert!(report.transfers <= 11);
    assert_eq!(report.errors, 0);
    assert_eq!(store.total_balance().await.unwrap(), 400.0);
}

#[tokio::test(start_paused = true)]
async fn preparing_twice_reseeds_from_scratch() {
    let store = Arc::new(MemoryStore::new());
    let simulation = Simulation::new(Arc::clone(&store), config(5, 1)).unwrap();

    let first = simulation.prepare().await.unwrap();
    let second = simulation.prepare().await.unwrap();

    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 5);
    // The reset step dropped the first generation of rows.
    assert_eq!(store.total_balance().await.unwrap(), 500.0);
}
