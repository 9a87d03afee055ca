//! Running statistics for the simulation loop.

use hdrhistogram::Histogram;
use std::time::Duration;

/// Process-lifetime accumulator for the loop.
///
/// Error count and downtime are monotonically non-decreasing; nothing
/// resets them short of a restart. Cancelled transfers are recorded as
/// neither success nor failure.
pub struct SimulationStats {
    transfers: u64,
    errors: u64,
    downtime: Duration,
    latencies: Histogram<u64>,
}

impl SimulationStats {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            transfers: 0,
            errors: 0,
            downtime: Duration::ZERO,
            latencies: Histogram::new(3).expect("histogram creation should succeed"),
        }
    }

    /// Record a committed transfer.
    pub fn record_success(&mut self, elapsed: Duration) {
        self.transfers += 1;
        self.record_latency(elapsed);
    }

    /// Record a counted failure: one error, its latency attributed as
    /// downtime.
    pub fn record_failure(&mut self, elapsed: Duration) {
        self.transfers += 1;
        self.errors += 1;
        self.downtime += elapsed;
        self.record_latency(elapsed);
    }

    fn record_latency(&mut self, elapsed: Duration) {
        self.latencies.record(elapsed.as_micros() as u64).ok();
    }

    /// Transfers recorded so far, successes and counted failures.
    pub fn transfers(&self) -> u64 {
        self.transfers
    }

    /// Counted failures so far.
    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// Elapsed time accumulated across counted failures.
    pub fn total_downtime(&self) -> Duration {
        self.downtime
    }

    /// Snapshot the accumulator into a final report.
    pub fn report(&self, duration: Duration) -> SimulationReport {
        SimulationReport {
            duration,
            transfers: self.transfers,
            errors: self.errors,
            total_downtime: self.downtime,
            p50_latency: Duration::from_micros(self.latencies.value_at_quantile(0.5)),
            p99_latency: Duration::from_micros(self.latencies.value_at_quantile(0.99)),
            max_latency: Duration::from_micros(self.latencies.max()),
        }
    }
}

impl Default for SimulationStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Report generated when a simulation run ends.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Total duration of the run.
    pub duration: Duration,
    /// Transfers recorded, successes and counted failures.
    pub transfers: u64,
    /// Counted failures.
    pub errors: u64,
    /// Elapsed time accumulated across counted failures.
    pub total_downtime: Duration,
    /// Median transfer latency.
    pub p50_latency: Duration,
    /// 99th percentile transfer latency.
    pub p99_latency: Duration,
    /// Worst transfer latency.
    pub max_latency: Duration,
}

impl SimulationReport {
    /// Print the report to stdout.
    pub fn print(&self) {
        println!("\n=== Simulation Report ===");
        println!("Duration: {:?}", self.duration);
        println!("Transfers: {}", self.transfers);
        println!("Errors: {}", self.errors);
        println!("Total downtime: {:.2}s", self.total_downtime.as_secs_f64());
        println!("Latency p50: {:?}", self.p50_latency);
        println!("Latency p99: {:?}", self.p99_latency);
        println!("Latency max: {:?}", self.max_latency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_count_exactly_once() {
        let mut stats = SimulationStats::new();
        assert_eq!(stats.errors(), 0);
        assert_eq!(stats.total_downtime(), Duration::ZERO);

        stats.record_failure(Duration::from_millis(200));
        assert_eq!(stats.errors(), 1);
        assert_eq!(stats.total_downtime(), Duration::from_millis(200));

        stats.record_failure(Duration::from_millis(300));
        assert_eq!(stats.errors(), 2);
        assert_eq!(stats.total_downtime(), Duration::from_millis(500));
    }

    #[test]
    fn successes_leave_error_figures_untouched() {
        let mut stats = SimulationStats::new();
        stats.record_success(Duration::from_millis(50));
        stats.record_success(Duration::from_millis(60));

        assert_eq!(stats.transfers(), 2);
        assert_eq!(stats.errors(), 0);
        assert_eq!(stats.total_downtime(), Duration::ZERO);
    }

    #[test]
    fn report_snapshots_the_accumulator() {
        let mut stats = SimulationStats::new();
        stats.record_success(Duration::from_millis(10));
        stats.record_failure(Duration::from_millis(40));

        let report = stats.report(Duration::from_secs(1));
        assert_eq!(report.transfers, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.total_downtime, Duration::from_millis(40));
        assert!(report.max_latency >= report.p50_latency);
    }
}
