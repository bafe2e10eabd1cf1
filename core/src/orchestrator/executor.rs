//! Orchestrator execution logic

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, watch};

use crate::config::DispatchConfig;
use crate::counter::ProcessedCounter;
use crate::error::{DispatchError, DispatchResult};
use crate::producer::{Producer, ProducerStats};
use crate::queue::work_queue;
use crate::traits::{ItemHandler, PermitGate};
use crate::worker::{DoneSignal, WorkerBuilder, WorkerStats};

use super::aggregator::RunSummary;
use super::phase::RunPhase;

/// Orchestrator manages the dispatch lifecycle
///
/// Spawns the producer and the worker pool, then acts as the completion
/// coordinator: it waits for exactly one done signal per worker before
/// reading the processed counter and reporting.
pub struct Orchestrator {
    /// Dispatch configuration
    pub(crate) config: DispatchConfig,

    /// Rate limiter (shared across workers)
    pub(crate) gate: Arc<dyn PermitGate>,

    /// Item handler (shared across workers)
    pub(crate) handler: Arc<dyn ItemHandler>,

    /// Lifecycle phase publisher
    pub(crate) phase_tx: watch::Sender<RunPhase>,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder` for a more ergonomic construction.
    pub fn new(
        config: DispatchConfig,
        gate: Arc<dyn PermitGate>,
        handler: Arc<dyn ItemHandler>,
    ) -> Self {
        let (phase_tx, _) = watch::channel(RunPhase::Starting);

        Self {
            config,
            gate,
            handler,
            phase_tx,
        }
    }

    /// Get a receiver that observes lifecycle phase changes
    pub fn phase(&self) -> watch::Receiver<RunPhase> {
        self.phase_tx.subscribe()
    }

    /// Get the dispatch configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    fn enter(&self, phase: RunPhase) {
        tracing::debug!(%phase, "Run phase changed");
        self.phase_tx.send_replace(phase);
    }

    /// Run the dispatch
    ///
    /// Spawns the producer and workers, waits for every done signal, and
    /// returns the final summary. The summary line is logged exactly once.
    ///
    /// # Errors
    /// Any failure is fatal and no summary is produced:
    /// - [`DispatchError::WorkerLost`] if workers exit without signalling
    /// - [`DispatchError::QueueClosed`] if the producer finds no workers
    /// - [`DispatchError::Task`] if a spawned task panics
    pub async fn run(&self) -> DispatchResult<RunSummary> {
        self.config.validate()?;

        let start = Instant::now();
        self.enter(RunPhase::Starting);

        let workers = self.config.workers;
        let counter = Arc::new(ProcessedCounter::new());
        let (batch_tx, batch_rx) = work_queue(self.config.channel.queue_buffer);
        let (done_tx, mut done_rx) = mpsc::channel::<DoneSignal>(self.config.channel.done_buffer);

        tracing::info!(
            workers,
            total_items = self.config.total_items,
            batch_size = self.config.batch_size,
            rate_limit = ?self.config.rate_limit,
            "Starting dispatch"
        );

        // Spawn worker tasks
        let mut handles = Vec::with_capacity(workers);
        for worker_id in 1..=workers {
            let worker = WorkerBuilder::new(worker_id)
                .queue(batch_rx.clone())
                .gate(Arc::clone(&self.gate))
                .handler(Arc::clone(&self.handler))
                .counter(Arc::clone(&counter))
                .done_tx(done_tx.clone())
                .start(start)
                .build()?;

            handles.push(tokio::spawn(worker.run()));
        }
        // Only workers hold these now, so closure tracks worker lifetimes.
        drop(batch_rx);
        drop(done_tx);

        let producer = Producer::new(self.config.total_items, self.config.batch_size, start);
        let mut producer_handle = tokio::spawn(producer.run(batch_tx));
        let mut producer_stats: Option<ProducerStats> = None;
        self.enter(RunPhase::Running);

        // Wait for exactly one done signal per worker
        let mut worker_stats: Vec<WorkerStats> = Vec::with_capacity(workers);
        while worker_stats.len() < workers {
            tokio::select! {
                result = &mut producer_handle, if producer_stats.is_none() => {
                    producer_stats = Some(result??);
                    self.enter(RunPhase::Draining);
                }
                signal = done_rx.recv() => {
                    let Some(signal) = signal else {
                        return Err(DispatchError::WorkerLost {
                            received: worker_stats.len(),
                            expected: workers,
                        });
                    };
                    tracing::info!(
                        elapsed = ?start.elapsed(),
                        worker_id = signal.worker_id,
                        received = worker_stats.len() + 1,
                        "Done received"
                    );
                    worker_stats.push(signal.stats);
                }
            }
        }

        let producer_stats = match producer_stats {
            Some(stats) => stats,
            None => producer_handle.await??,
        };
        self.enter(RunPhase::AllDone);

        for result in futures::future::join_all(handles).await {
            result??;
        }

        self.enter(RunPhase::Reporting);
        let elapsed = start.elapsed();
        let summary = RunSummary::new(
            counter.get(),
            producer_stats.batches,
            elapsed,
            &worker_stats,
        );

        tracing::info!(
            elapsed = ?elapsed,
            total = summary.total_processed,
            minutes = summary.elapsed_minutes(),
            per_minute = summary.per_minute,
            "Done. Actual rate: {} / {:.6} minutes = {:.6} per minute",
            summary.total_processed,
            summary.elapsed_minutes(),
            summary.per_minute
        );

        self.enter(RunPhase::Terminated);
        Ok(summary)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("handler", &self.handler.name())
            .field("phase", &*self.phase_tx.borrow())
            .finish()
    }
}
