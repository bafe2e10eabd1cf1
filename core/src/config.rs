//! Dispatch configuration types

use crate::channel::ChannelConfig;
use serde::{Deserialize, Serialize};

/// Default number of project IDs produced per run
pub const DEFAULT_TOTAL_ITEMS: usize = 200;

/// Default number of project IDs per batch
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default number of concurrent workers
pub const DEFAULT_WORKERS: usize = 5;

/// Default sustained permits per minute
///
/// Kept below a 100/minute upstream quota so a full burst at a window edge
/// still fits.
pub const DEFAULT_PER_MINUTE: u32 = 95;

/// Default token bucket capacity
pub const DEFAULT_BURST: u32 = 5;

/// Token bucket parameters for the shared rate limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Sustained ceiling, in permits per minute
    pub per_minute: u32,

    /// Maximum permits granted at once from a full bucket
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_minute: DEFAULT_PER_MINUTE,
            burst: DEFAULT_BURST,
        }
    }
}

impl RateLimitConfig {
    /// Create a new rate limit
    pub fn new(per_minute: u32, burst: u32) -> Self {
        Self { per_minute, burst }
    }

    /// Refill rate in permits per second
    pub fn per_second(&self) -> f64 {
        f64::from(self.per_minute) / 60.0
    }

    /// Validate the ceiling and burst
    ///
    /// Both must be at least 1. Disabling the limiter is expressed by having
    /// no `RateLimitConfig` at all, never by a zero field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_minute == 0 {
            return Err(ConfigError::InvalidRateLimit(
                "ceiling must be at least 1 per minute".into(),
            ));
        }
        if self.burst == 0 {
            return Err(ConfigError::InvalidRateLimit(
                "burst must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Dispatch configuration
///
/// Defines how many project IDs are produced, how they are batched, how many
/// workers drain the queue, and how the shared rate limiter is tuned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Total number of project IDs, produced as `[0, total_items)`
    pub total_items: usize,

    /// Project IDs per batch
    pub batch_size: usize,

    /// Number of concurrent workers
    pub workers: usize,

    /// Shared rate limit; `None` (JSON `null`) disables limiting
    pub rate_limit: Option<RateLimitConfig>,

    /// Channel buffer sizes
    pub channel: ChannelConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            total_items: DEFAULT_TOTAL_ITEMS,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
            rate_limit: Some(RateLimitConfig::default()),
            channel: ChannelConfig::default(),
        }
    }
}

impl DispatchConfig {
    /// Create a new config with the given worker count
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Default::default()
        }
    }

    /// Set the total number of project IDs
    pub fn with_total_items(mut self, total: usize) -> Self {
        self.total_items = total;
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, per_minute: u32, burst: u32) -> Self {
        self.rate_limit = Some(RateLimitConfig::new(per_minute, burst));
        self
    }

    /// Disable rate limiting
    pub fn unlimited(mut self) -> Self {
        self.rate_limit = None;
        self
    }

    /// Set the channel configuration
    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }

    /// Number of batches the producer will emit
    pub fn batch_count(&self) -> usize {
        if self.batch_size == 0 {
            0
        } else {
            self.total_items.div_ceil(self.batch_size)
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkers(
                "worker count must be at least 1".into(),
            ));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(
                "batch size must be at least 1".into(),
            ));
        }

        if let Some(limit) = self.rate_limit {
            limit.validate()?;
        }

        if self.channel.queue_buffer == 0 || self.channel.done_buffer == 0 {
            return Err(ConfigError::InvalidChannel(
                "channel buffers must hold at least 1 message".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count: {0}")]
    InvalidWorkers(String),

    /// Invalid batch size
    #[error("Invalid batch size: {0}")]
    InvalidBatchSize(String),

    /// Invalid rate limit
    #[error("Invalid rate limit: {0}")]
    InvalidRateLimit(String),

    /// Invalid channel buffer
    #[error("Invalid channel config: {0}")]
    InvalidChannel(String),
}
