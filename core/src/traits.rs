//! Core traits for the pipeline seams
//!
//! Workers depend on these rather than on concrete types so the limiter and
//! the per-item work can be swapped in tests.

use crate::error::{DispatchError, DispatchResult};
use crate::queue::ProjectId;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Permit Gate Trait
// ============================================================================

/// A shared source of processing permits
///
/// One instance is shared by all workers. Implementations must be internally
/// synchronized so concurrent callers never receive the same permit twice.
#[async_trait]
pub trait PermitGate: Send + Sync {
    /// Wait until a permit is available, then take it
    async fn acquire(&self);

    /// Wait for a permit unless `cancel` fires first
    ///
    /// Returns [`DispatchError::Cancelled`] when the token is cancelled before
    /// a permit is granted.
    async fn acquire_with_cancel(&self, cancel: &CancellationToken) -> DispatchResult<()> {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(DispatchError::Cancelled),
            _ = self.acquire() => Ok(()),
        }
    }
}

// ============================================================================
// Item Handler Trait
// ============================================================================

/// Per-item work performed by a worker after it holds a permit
///
/// Handling an item cannot fail; anything that goes wrong inside a handler is
/// a fault of the process, not of the item.
#[async_trait]
pub trait ItemHandler: Send + Sync {
    /// Handler identifier for logs
    fn name(&self) -> &str;

    /// Process one project ID
    async fn handle(&self, worker_id: usize, item: ProjectId);
}

/// Handler that does nothing; the permit and the count are the work
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

#[async_trait]
impl ItemHandler for NoopHandler {
    fn name(&self) -> &str {
        "noop"
    }

    async fn handle(&self, _worker_id: usize, _item: ProjectId) {}
}
