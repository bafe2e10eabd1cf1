//! Worker execution loop

use crate::counter::{is_milestone, ProcessedCounter};
use crate::error::{DispatchError, DispatchResult};
use crate::queue::BatchReceiver;
use crate::traits::{ItemHandler, PermitGate};

use super::signal::DoneSignal;
use super::stats::WorkerStats;

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Worker drains batches in a loop: receive -> acquire -> handle -> count
///
/// Workers are tokio tasks spawned by the Orchestrator. They share the work
/// queue, the permit gate and the processed counter via Arc, and report
/// completion through a done signal channel.
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// Shared consumer half of the work queue
    queue: BatchReceiver,

    /// Rate limiter shared by the whole pool
    gate: Arc<dyn PermitGate>,

    /// Per-item work
    handler: Arc<dyn ItemHandler>,

    /// Process-wide processed counter
    counter: Arc<ProcessedCounter>,

    /// Done signal sender (one signal per worker)
    done_tx: mpsc::Sender<DoneSignal>,

    /// Run start, for elapsed fields in logs
    start: Instant,
}

impl Worker {
    /// Create a new worker
    ///
    /// Use `WorkerBuilder` for a more ergonomic construction.
    pub fn new(
        id: usize,
        queue: BatchReceiver,
        gate: Arc<dyn PermitGate>,
        handler: Arc<dyn ItemHandler>,
        counter: Arc<ProcessedCounter>,
        done_tx: mpsc::Sender<DoneSignal>,
        start: Instant,
    ) -> Self {
        Self {
            id,
            queue,
            gate,
            handler,
            counter,
            done_tx,
            start,
        }
    }

    /// Run the worker loop
    ///
    /// Returns once the queue is closed and drained, after sending exactly one
    /// [`DoneSignal`]. Items within a batch are processed in batch order.
    ///
    /// # Errors
    /// Returns [`DispatchError::SignalClosed`] if the coordinator is no longer
    /// listening for done signals.
    pub async fn run(self) -> DispatchResult<WorkerStats> {
        let mut stats = WorkerStats::new();
        stats.start();

        tracing::info!(
            worker_id = self.id,
            elapsed = ?self.start.elapsed(),
            "Worker launched"
        );

        while let Some(batch) = self.queue.recv().await {
            stats.record_batch();
            tracing::debug!(
                worker_id = self.id,
                batch = batch.sequence(),
                size = batch.len(),
                "Batch received"
            );

            for item in batch {
                self.gate.acquire().await;
                self.handler.handle(self.id, item).await;

                let processed = self.counter.increment();
                stats.record_item();

                if is_milestone(processed) {
                    tracing::info!(
                        elapsed = ?self.start.elapsed(),
                        worker_id = self.id,
                        processed,
                        "ProjectIDs processed"
                    );
                }
            }
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            batches = stats.batches,
            items = stats.items,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            per_minute = stats.items_per_minute(),
            "Worker finished"
        );

        self.done_tx
            .send(DoneSignal {
                worker_id: self.id,
                stats: stats.clone(),
            })
            .await
            .map_err(|_| DispatchError::SignalClosed { worker_id: self.id })?;

        Ok(stats)
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("handler", &self.handler.name())
            .field("processed", &self.counter.get())
            .finish()
    }
}
