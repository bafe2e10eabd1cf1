//! Worker statistics tracking

use std::time::{Duration, Instant};

/// Statistics tracked by each worker
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Batches received from the work queue
    pub batches: usize,

    /// Project IDs processed
    pub items: usize,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Record a batch taken from the queue
    pub fn record_batch(&mut self) {
        self.batches += 1;
    }

    /// Record one processed project ID
    pub fn record_item(&mut self) {
        self.items += 1;
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Get items processed per minute
    pub fn items_per_minute(&self) -> f64 {
        self.elapsed()
            .map(|d| {
                let mins = d.as_secs_f64() / 60.0;
                if mins > 0.0 {
                    self.items as f64 / mins
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0)
    }

    /// Merge counts from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.batches += other.batches;
        self.items += other.items;
    }
}
