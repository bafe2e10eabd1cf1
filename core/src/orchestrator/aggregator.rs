//! Result aggregation from multiple workers

use std::time::Duration;

use crate::worker::WorkerStats;

/// Aggregated statistics from all workers
#[derive(Debug, Clone, Default)]
pub struct AggregatedStats {
    /// Number of workers that reported
    pub total_workers: usize,

    /// Total batches received
    pub total_batches: usize,

    /// Total project IDs processed
    pub total_items: usize,

    /// Maximum duration across all workers
    pub total_duration: Duration,
}

/// Aggregate statistics from multiple workers
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedStats {
    if stats.is_empty() {
        return AggregatedStats::default();
    }

    let mut merged = WorkerStats::new();
    for s in stats {
        merged.merge(s);
    }

    // Use the maximum elapsed time across all workers
    let total_duration = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    AggregatedStats {
        total_workers: stats.len(),
        total_batches: merged.batches,
        total_items: merged.items,
        total_duration,
    }
}

/// Effective throughput: `total / elapsed-minutes`, or 0 for a zero duration
pub fn rate_per_minute(total: usize, elapsed: Duration) -> f64 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes > 0.0 {
        total as f64 / minutes
    } else {
        0.0
    }
}

/// Final report of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Final value of the processed counter
    pub total_processed: usize,

    /// Batches the producer pushed
    pub total_batches: usize,

    /// Wall time from run start to the last done signal
    pub elapsed: Duration,

    /// Effective throughput over the whole run
    pub per_minute: f64,

    /// Figures aggregated from every done signal
    pub workers: AggregatedStats,
}

impl RunSummary {
    /// Build the summary from the counter value and run elapsed time
    pub fn new(
        total_processed: usize,
        total_batches: usize,
        elapsed: Duration,
        worker_stats: &[WorkerStats],
    ) -> Self {
        Self {
            total_processed,
            total_batches,
            elapsed,
            per_minute: rate_per_minute(total_processed, elapsed),
            workers: aggregate_worker_stats(worker_stats),
        }
    }

    /// Elapsed wall time in minutes
    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed.as_secs_f64() / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn stats(batches: usize, items: usize, secs: u64) -> WorkerStats {
        let start = Instant::now();
        WorkerStats {
            batches,
            items,
            started_at: Some(start),
            ended_at: Some(start + Duration::from_secs(secs)),
        }
    }

    #[test]
    fn test_aggregate_empty() {
        let aggregated = aggregate_worker_stats(&[]);
        assert_eq!(aggregated.total_workers, 0);
        assert_eq!(aggregated.total_items, 0);
        assert_eq!(aggregated.total_duration, Duration::ZERO);
    }

    #[test]
    fn test_aggregate_sums_and_takes_max_duration() {
        let aggregated = aggregate_worker_stats(&[stats(2, 20, 10), stats(3, 30, 40)]);
        assert_eq!(aggregated.total_workers, 2);
        assert_eq!(aggregated.total_batches, 5);
        assert_eq!(aggregated.total_items, 50);
        assert_eq!(aggregated.total_duration, Duration::from_secs(40));
    }

    #[test]
    fn test_rate_per_minute() {
        assert!((rate_per_minute(200, Duration::from_secs(120)) - 100.0).abs() < 1e-9);
        assert!((rate_per_minute(95, Duration::from_secs(60)) - 95.0).abs() < 1e-9);
        assert_eq!(rate_per_minute(10, Duration::ZERO), 0.0);
        assert_eq!(rate_per_minute(0, Duration::from_secs(5)), 0.0);
    }

    #[test]
    fn test_run_summary() {
        let summary = RunSummary::new(
            60,
            6,
            Duration::from_secs(30),
            &[stats(3, 30, 30), stats(3, 30, 29)],
        );
        assert_eq!(summary.total_processed, 60);
        assert!((summary.per_minute - 120.0).abs() < 1e-9);
        assert!((summary.elapsed_minutes() - 0.5).abs() < 1e-9);
        assert_eq!(summary.workers.total_items, 60);
    }
}
