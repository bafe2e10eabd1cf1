//! Worker module for draining the work queue
//!
//! Each Worker is a tokio task running the same loop:
//!
//! 1. Receive the next batch from the shared work queue
//! 2. For each project ID in batch order, wait for a permit from the shared
//!    rate limiter
//! 3. Hand the project ID to the item handler
//! 4. Increment the process-wide counter, logging milestones
//! 5. Repeat until the queue is closed and drained, then send one done signal
//!
//! Which worker gets which batch is up to the queue; each batch goes to
//! exactly one worker.
//!
//! # Example
//!
//! ```ignore
//! use rated_dispatch_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .queue(rx.clone())
//!     .gate(limiter.clone())
//!     .counter(counter.clone())
//!     .done_tx(done_tx.clone())
//!     .build()?;
//!
//! let stats = worker.run().await?;
//! println!("Processed: {}", stats.items);
//! ```

mod builder;
mod executor;
mod signal;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use signal::DoneSignal;
pub use stats::WorkerStats;
