//! Error types for rated-dispatch-core

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type
///
/// Processing a single item cannot fail, so every variant here describes a
/// fault in the pipeline itself. All of them are fatal to a run.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Configuration rejected by validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A builder was missing a required part
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Permit acquisition was cancelled before a token was granted
    #[error("rate limiter acquisition cancelled")]
    Cancelled,

    /// The work queue has no receivers left
    #[error("work queue closed: no workers are receiving")]
    QueueClosed,

    /// The done channel closed before every worker reported
    #[error("worker lost: received {received} of {expected} done signals")]
    WorkerLost {
        /// Done signals received before the channel closed
        received: usize,
        /// Done signals the coordinator was waiting for
        expected: usize,
    },

    /// The coordinator stopped listening for done signals
    #[error("done signal channel closed before worker {worker_id} could report")]
    SignalClosed {
        /// Worker whose signal could not be delivered
        worker_id: usize,
    },

    /// A spawned task panicked or was aborted
    #[error("task failure: {0}")]
    Task(String),
}

impl DispatchError {
    /// Build a `MissingConfig` error for the named builder field
    pub fn missing_config(field: &'static str) -> Self {
        Self::MissingConfig(field)
    }
}

impl From<tokio::task::JoinError> for DispatchError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Result type alias
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;
