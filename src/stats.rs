use std::time::Instant;

use serde::Serialize;

/// Monotonic per-run row counters.
///
/// Counters only ever increase for the life of one run; derived figures
/// (drop rate, throughput) are computed on demand by [`RunStats::report`],
/// never stored.
#[derive(Debug)]
pub struct RunStats {
    total_processed: u64,
    valid_count: u64,
    dropped_count: u64,
    started_at: Instant,
}

/// Point-in-time summary of a run's row outcomes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsReport {
    /// Rows observed by the pipeline (accepted + dropped).
    pub total_processed: u64,
    /// Rows accepted and written to a shard.
    pub valid_rows: u64,
    /// Rows dropped by sampling or validation.
    pub dropped_rows: u64,
    /// Dropped share of all processed rows, as a percentage with two
    /// decimals (`0.0` when nothing was processed).
    pub drop_rate_percent: f64,
    /// Wall-clock seconds since the collector was created, two decimals.
    pub elapsed_seconds: f64,
    /// Integer rows-per-second throughput (`0` when no time has elapsed).
    pub rows_per_sec: u64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    /// Start a collector; the throughput clock begins now.
    pub fn new() -> Self {
        Self {
            total_processed: 0,
            valid_count: 0,
            dropped_count: 0,
            started_at: Instant::now(),
        }
    }

    /// Record the outcome of one row.
    pub fn update(&mut self, is_valid: bool) {
        self.total_processed += 1;
        if is_valid {
            self.valid_count += 1;
        } else {
            self.dropped_count += 1;
        }
    }

    /// Rows accepted so far.
    pub fn valid_count(&self) -> u64 {
        self.valid_count
    }

    /// Rows observed so far.
    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    /// Snapshot the counters and derived figures.
    pub fn report(&self) -> StatsReport {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        let drop_rate = if self.total_processed > 0 {
            (self.dropped_count as f64 / self.total_processed as f64) * 100.0
        } else {
            0.0
        };
        let rows_per_sec = if elapsed > 0.0 {
            (self.total_processed as f64 / elapsed) as u64
        } else {
            0
        };
        StatsReport {
            total_processed: self.total_processed,
            valid_rows: self.valid_count,
            dropped_rows: self.dropped_count,
            drop_rate_percent: round2(drop_rate),
            elapsed_seconds: round2(elapsed),
            rows_per_sec,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_summarizes_mixed_outcomes() {
        // Three rows: two rejected for length, one accepted.
        let mut stats = RunStats::new();
        stats.update(false);
        stats.update(false);
        stats.update(true);

        let report = stats.report();
        assert_eq!(report.total_processed, 3);
        assert_eq!(report.valid_rows, 1);
        assert_eq!(report.dropped_rows, 2);
        assert!((report.drop_rate_percent - 66.67).abs() < 1e-9);
    }

    #[test]
    fn empty_run_reports_zero_drop_rate() {
        let stats = RunStats::new();
        let report = stats.report();
        assert_eq!(report.total_processed, 0);
        assert_eq!(report.drop_rate_percent, 0.0);
        assert_eq!(report.rows_per_sec, 0);
    }

    #[test]
    fn counters_are_monotonic() {
        let mut stats = RunStats::new();
        for n in 0..10 {
            stats.update(n % 2 == 0);
            let report = stats.report();
            assert_eq!(report.total_processed, n + 1);
            assert_eq!(report.valid_rows + report.dropped_rows, n + 1);
        }
    }
}
