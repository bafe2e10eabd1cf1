//! Done signal sent once by every worker

use super::stats::WorkerStats;

/// Emitted exactly once when a worker's queue is closed and drained
#[derive(Debug, Clone)]
pub struct DoneSignal {
    /// Worker that finished
    pub worker_id: usize,

    /// What that worker did
    pub stats: WorkerStats,
}
