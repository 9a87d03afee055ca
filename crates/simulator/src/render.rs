//! Status line rendering.

use crate::stats::SimulationStats;
use colored::Colorize;
use ledgerload_types::AccountId;
use std::time::Duration;

/// Latency figure color.
const LATENCY_RGB: (u8, u8, u8) = (0, 252, 237);

/// Error and downtime figure color.
const ERROR_RGB: (u8, u8, u8) = (236, 63, 150);

/// Stateless formatter for the per-tick status line.
///
/// Holds nothing but the color switch, so it can be handed to the reporting
/// step as a plain value.
#[derive(Debug, Clone, Copy)]
pub struct StatusFormatter {
    colors: bool,
}

impl StatusFormatter {
    /// Create a formatter; `colors` switches truecolor styling.
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Render one status line for a finished tick.
    pub fn status_line(
        &self,
        from: &AccountId,
        to: &AccountId,
        elapsed: Duration,
        stats: &SimulationStats,
    ) -> String {
        let latency = format!("{}ms", elapsed.as_millis());
        let errors = stats.errors().to_string();
        let downtime = format!("{:.2}s", stats.total_downtime().as_secs_f64());

        let (latency, errors, downtime) = if self.colors {
            let (lr, lg, lb) = LATENCY_RGB;
            let (er, eg, eb) = ERROR_RGB;
            (
                latency.truecolor(lr, lg, lb).to_string(),
                errors.truecolor(er, eg, eb).to_string(),
                downtime.truecolor(er, eg, eb).to_string(),
            )
        } else {
            (latency, errors, downtime)
        };

        format!(
            "{} -> {} (latency: {}, errors: {}, total downtime: {})",
            from.short(),
            to.short(),
            latency,
            errors,
            downtime
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_matches_the_documented_shape() {
        let from = AccountId::random();
        let to = AccountId::random();
        let mut stats = SimulationStats::new();
        stats.record_failure(Duration::from_millis(1500));

        let line = StatusFormatter::new(false).status_line(
            &from,
            &to,
            Duration::from_millis(42),
            &stats,
        );

        assert_eq!(
            line,
            format!(
                "{} -> {} (latency: 42ms, errors: 1, total downtime: 1.50s)",
                from.short(),
                to.short()
            )
        );
    }

    #[test]
    fn styled_line_keeps_the_same_figures() {
        let from = AccountId::random();
        let to = AccountId::random();
        let stats = SimulationStats::new();

        let line = StatusFormatter::new(true).status_line(
            &from,
            &to,
            Duration::from_millis(7),
            &stats,
        );

        assert!(line.contains("7ms"));
        assert!(line.contains(&from.short()));
        assert!(line.contains("->"));
    }
}
