//! Channel configuration for pipeline communication

use serde::{Deserialize, Serialize};

/// Channel buffer configuration for producer/worker/coordinator hand-off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Work queue buffer size (producer -> workers), in batches
    pub queue_buffer: usize,

    /// Done signal buffer size (workers -> coordinator)
    pub done_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            queue_buffer: 1,
            done_buffer: 16,
        }
    }
}

impl ChannelConfig {
    /// Set the work queue buffer size
    pub fn with_queue_buffer(mut self, size: usize) -> Self {
        self.queue_buffer = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_config_default() {
        let config = ChannelConfig::default();
        assert_eq!(config.queue_buffer, 1);
        assert_eq!(config.done_buffer, 16);
    }

    #[test]
    fn test_channel_config_builder() {
        let config = ChannelConfig::default().with_queue_buffer(4);
        assert_eq!(config.queue_buffer, 4);
        assert_eq!(config.done_buffer, 16);
    }
}
