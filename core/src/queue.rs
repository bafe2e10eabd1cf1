//! Work queue connecting the producer to the worker pool
//!
//! A bounded tokio `mpsc` channel whose single receiver is shared by all
//! workers behind an async mutex. Whichever worker holds the lock takes the
//! next batch, so each batch reaches exactly one worker. Dropping the sender
//! closes the queue; every receiver then drains what is buffered and sees
//! `None`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};

use crate::error::{DispatchError, DispatchResult};

/// Identifier of a single work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// An ordered group of project IDs handed to one worker as a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkBatch {
    sequence: usize,
    items: Vec<ProjectId>,
}

impl WorkBatch {
    /// Create a batch with its position in the production order
    pub fn new(sequence: usize, items: Vec<ProjectId>) -> Self {
        Self { sequence, items }
    }

    /// Position of this batch in production order, starting at 0
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// Project IDs in batch order
    pub fn items(&self) -> &[ProjectId] {
        &self.items
    }

    /// Number of project IDs
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch holds no project IDs
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for WorkBatch {
    type Item = ProjectId;
    type IntoIter = std::vec::IntoIter<ProjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Create a work queue holding at most `capacity` batches in flight
///
/// A zero capacity is raised to 1, the closest tokio `mpsc` gets to a
/// rendezvous hand-off.
pub fn work_queue(capacity: usize) -> (BatchSender, BatchReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        BatchSender { tx },
        BatchReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer half of the work queue
#[derive(Debug)]
pub struct BatchSender {
    tx: mpsc::Sender<WorkBatch>,
}

impl BatchSender {
    /// Push a batch, waiting while the queue is full
    ///
    /// # Errors
    /// Returns [`DispatchError::QueueClosed`] if every receiver is gone.
    pub async fn send(&self, batch: WorkBatch) -> DispatchResult<()> {
        self.tx
            .send(batch)
            .await
            .map_err(|_| DispatchError::QueueClosed)
    }

    /// Whether every receiver has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Signal that no more batches will be sent
    ///
    /// Buffered batches are still delivered.
    pub fn close(self) {
        drop(self);
    }
}

/// Consumer half of the work queue, cloned once per worker
#[derive(Debug, Clone)]
pub struct BatchReceiver {
    rx: Arc<Mutex<mpsc::Receiver<WorkBatch>>>,
}

impl BatchReceiver {
    /// Take the next batch
    ///
    /// Waits while the queue is empty and open. Returns `None` once the queue
    /// is closed and drained, and keeps returning `None` after that.
    pub async fn recv(&self) -> Option<WorkBatch> {
        self.rx.lock().await.recv().await
    }
}
