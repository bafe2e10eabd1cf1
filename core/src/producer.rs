//! Batch producer
//!
//! Partitions `[0, total)` into consecutive batches, pushes them onto the work
//! queue in ascending order, then closes the queue.

use std::time::Instant;

use crate::error::DispatchResult;
use crate::queue::{BatchSender, ProjectId, WorkBatch};

/// Split `[0, total)` into ascending batches of `batch_size` project IDs
///
/// Yields `ceil(total / batch_size)` batches; only the last may be short.
/// A zero `batch_size` yields nothing.
pub fn partition(total: usize, batch_size: usize) -> impl Iterator<Item = WorkBatch> {
    let step = batch_size.max(1);
    let starts = if batch_size == 0 { 0..0 } else { 0..total };

    starts.step_by(step).enumerate().map(move |(sequence, first)| {
        let last = (first + step).min(total);
        let items = (first..last).map(|id| ProjectId(id as u64)).collect();
        WorkBatch::new(sequence, items)
    })
}

/// Counts reported by the producer once the queue is closed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerStats {
    /// Batches pushed onto the queue
    pub batches: usize,

    /// Project IDs across all batches
    pub items: usize,
}

/// Single producer that fills the work queue once
#[derive(Debug, Clone)]
pub struct Producer {
    total_items: usize,
    batch_size: usize,
    start: Instant,
}

impl Producer {
    /// Create a producer for `[0, total_items)`
    ///
    /// `start` is the run's start instant, used for elapsed fields in logs.
    pub fn new(total_items: usize, batch_size: usize, start: Instant) -> Self {
        Self {
            total_items,
            batch_size,
            start,
        }
    }

    /// Push every batch in order, then close the queue
    ///
    /// # Errors
    /// Returns [`DispatchError::QueueClosed`](crate::DispatchError::QueueClosed)
    /// if all workers dropped their receivers before the last batch was sent.
    pub async fn run(self, tx: BatchSender) -> DispatchResult<ProducerStats> {
        tracing::info!(elapsed = ?self.start.elapsed(), "Producer launched");

        let mut stats = ProducerStats::default();
        for batch in partition(self.total_items, self.batch_size) {
            let len = batch.len();
            tx.send(batch).await?;
            stats.batches += 1;
            stats.items += len;
        }
        tx.close();

        tracing::info!(
            elapsed = ?self.start.elapsed(),
            batches = stats.batches,
            items = stats.items,
            "Producer done"
        );

        Ok(stats)
    }
}
