//! Orchestrator for the dispatch lifecycle
//!
//! The Orchestrator coordinates one complete run:
//! - Spawning the producer and the worker pool
//! - Sharing one rate limiter and one processed counter across workers
//! - Collecting exactly one done signal per worker
//! - Reporting total processed, elapsed time and effective rate
//!
//! # Example
//!
//! ```ignore
//! use rated_dispatch_core::OrchestratorBuilder;
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .workers(5)
//!     .rate_limit(95, 5)
//!     .build()?;
//!
//! let summary = orchestrator.run().await?;
//! ```

mod aggregator;
mod builder;
mod executor;
mod phase;

pub use aggregator::{aggregate_worker_stats, rate_per_minute, AggregatedStats, RunSummary};
pub use builder::OrchestratorBuilder;
pub use executor::Orchestrator;
pub use phase::RunPhase;
