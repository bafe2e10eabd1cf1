//! Builder pattern for Orchestrator construction

use std::sync::Arc;

use crate::channel::ChannelConfig;
use crate::config::{DispatchConfig, RateLimitConfig};
use crate::error::DispatchResult;
use crate::rate_limiter::RateLimiter;
use crate::traits::{ItemHandler, NoopHandler, PermitGate};

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// Unless a gate is supplied, one [`RateLimiter`] is built from the
/// configured rate limit and shared by every worker.
///
/// # Example
///
/// ```
/// use rated_dispatch_core::OrchestratorBuilder;
///
/// let orchestrator = OrchestratorBuilder::new()
///     .workers(5)
///     .total_items(200)
///     .batch_size(10)
///     .rate_limit(95, 5)
///     .build()
///     .unwrap();
/// assert_eq!(orchestrator.config().workers, 5);
/// ```
pub struct OrchestratorBuilder {
    config: DispatchConfig,
    gate: Option<Arc<dyn PermitGate>>,
    handler: Option<Arc<dyn ItemHandler>>,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: DispatchConfig::default(),
            gate: None,
            handler: None,
        }
    }

    /// Set the full dispatch configuration
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the worker count
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the total number of project IDs
    pub fn total_items(mut self, total: usize) -> Self {
        self.config.total_items = total;
        self
    }

    /// Set the batch size
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the rate limit (permits per minute, burst)
    pub fn rate_limit(mut self, per_minute: u32, burst: u32) -> Self {
        self.config.rate_limit = Some(RateLimitConfig::new(per_minute, burst));
        self
    }

    /// Disable rate limiting
    pub fn unlimited(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set the channel configuration
    pub fn channel_config(mut self, config: ChannelConfig) -> Self {
        self.config.channel = config;
        self
    }

    /// Use a custom permit gate instead of building a rate limiter
    pub fn gate(mut self, gate: Arc<dyn PermitGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Set the item handler
    pub fn handler(mut self, handler: Arc<dyn ItemHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn build(self) -> DispatchResult<Orchestrator> {
        self.config.validate()?;

        let gate: Arc<dyn PermitGate> = match self.gate {
            Some(gate) => gate,
            None => Arc::new(RateLimiter::new(self.config.rate_limit)?),
        };
        let handler: Arc<dyn ItemHandler> = match self.handler {
            Some(handler) => handler,
            None => Arc::new(NoopHandler),
        };

        Ok(Orchestrator::new(self.config, gate, handler))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
