//! rated-dispatch-core: Rate-limited batch dispatch across a worker pool
//!
//! This crate provides the pipeline that moves a fixed set of project IDs
//! from one producer to a fixed pool of workers under one global rate limit:
//!
//! - Token bucket rate limiter shared by every worker
//! - Bounded work queue of batches with close-then-drain semantics
//! - Producer partitioning `[0, total)` into ordered batches
//! - Worker pool counting each processed item exactly once
//! - Orchestrator collecting one done signal per worker before reporting

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod counter;
pub mod error;
pub mod orchestrator;
pub mod producer;
pub mod queue;
pub mod rate_limiter;
pub mod traits;
pub mod worker;

pub use channel::ChannelConfig;
pub use config::{ConfigError, DispatchConfig, RateLimitConfig};
pub use counter::ProcessedCounter;
pub use error::{DispatchError, DispatchResult};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, RunPhase, RunSummary};
pub use producer::{partition, Producer, ProducerStats};
pub use queue::{work_queue, BatchReceiver, BatchSender, ProjectId, WorkBatch};
pub use rate_limiter::RateLimiter;
pub use traits::{ItemHandler, NoopHandler, PermitGate};
pub use worker::{DoneSignal, Worker, WorkerBuilder, WorkerStats};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_config_file_round_trip_drives_run() {
        let json = r#"{
            "total_items": 40,
            "batch_size": 8,
            "workers": 3,
            "rate_limit": null
        }"#;
        let config: DispatchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.batch_count(), 5);

        let summary = OrchestratorBuilder::new()
            .config(config)
            .build()
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(summary.total_processed, 40);
        assert_eq!(summary.total_batches, 5);
    }

    #[tokio::test]
    async fn test_manual_wiring_matches_orchestrator() {
        let (tx, rx) = work_queue(1);
        let (done_tx, mut done_rx) = tokio::sync::mpsc::channel(4);
        let counter = Arc::new(ProcessedCounter::new());
        let gate: Arc<dyn PermitGate> = Arc::new(RateLimiter::unlimited());

        let handles: Vec<_> = (1..=2)
            .map(|id| {
                let worker = WorkerBuilder::new(id)
                    .queue(rx.clone())
                    .gate(Arc::clone(&gate))
                    .counter(Arc::clone(&counter))
                    .done_tx(done_tx.clone())
                    .build()
                    .unwrap();
                tokio::spawn(worker.run())
            })
            .collect();
        drop(done_tx);

        let stats = Producer::new(25, 10, std::time::Instant::now())
            .run(tx)
            .await
            .unwrap();
        assert_eq!(stats.batches, 3);

        let mut signals = 0;
        while done_rx.recv().await.is_some() {
            signals += 1;
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(signals, 2);
        assert_eq!(counter.get(), 25);
    }
}
