//! Runner configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the batch runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Capacity of the outbound event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_event_buffer() -> usize {
    256
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            event_buffer: default_event_buffer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(RunnerConfig::default().event_buffer, 256);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: RunnerConfig = toml::from_str("").unwrap();
        assert_eq!(config.event_buffer, 256);
    }
}
