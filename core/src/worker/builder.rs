//! Builder pattern for Worker construction

use crate::counter::ProcessedCounter;
use crate::error::{DispatchError, DispatchResult};
use crate::queue::BatchReceiver;
use crate::traits::{ItemHandler, NoopHandler, PermitGate};

use super::executor::Worker;
use super::signal::DoneSignal;

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Builder for creating Worker instances
///
/// Provides ergonomic construction with validation. The handler defaults to
/// [`NoopHandler`] and the start instant to the moment `build` is called.
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .queue(rx.clone())
///     .gate(limiter)
///     .counter(counter)
///     .done_tx(done_tx.clone())
///     .start(start)
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    queue: Option<BatchReceiver>,
    gate: Option<Arc<dyn PermitGate>>,
    handler: Option<Arc<dyn ItemHandler>>,
    counter: Option<Arc<ProcessedCounter>>,
    done_tx: Option<mpsc::Sender<DoneSignal>>,
    start: Option<Instant>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            queue: None,
            gate: None,
            handler: None,
            counter: None,
            done_tx: None,
            start: None,
        }
    }

    /// Set the work queue receiver
    pub fn queue(mut self, queue: BatchReceiver) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Set the shared permit gate
    pub fn gate(mut self, gate: Arc<dyn PermitGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Set the item handler
    pub fn handler(mut self, handler: Arc<dyn ItemHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Set the shared processed counter
    pub fn counter(mut self, counter: Arc<ProcessedCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Set the done signal sender
    pub fn done_tx(mut self, tx: mpsc::Sender<DoneSignal>) -> Self {
        self.done_tx = Some(tx);
        self
    }

    /// Set the run start instant
    pub fn start(mut self, start: Instant) -> Self {
        self.start = Some(start);
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> DispatchResult<Worker> {
        let queue = self.queue.ok_or(DispatchError::missing_config("queue"))?;
        let gate = self.gate.ok_or(DispatchError::missing_config("gate"))?;
        let counter = self
            .counter
            .ok_or(DispatchError::missing_config("counter"))?;
        let done_tx = self
            .done_tx
            .ok_or(DispatchError::missing_config("done_tx"))?;

        let handler: Arc<dyn ItemHandler> = match self.handler {
            Some(handler) => handler,
            None => Arc::new(NoopHandler),
        };
        let start = self.start.unwrap_or_else(Instant::now);

        Ok(Worker::new(
            self.id, queue, gate, handler, counter, done_tx, start,
        ))
    }
}
