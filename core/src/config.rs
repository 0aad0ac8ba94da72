//! Configuration for the broker client pair

use std::time::Duration;

/// Configuration shared by producers and consumers
#[derive(Debug, Clone)]
pub struct Config {
    /// Broker address, e.g. "localhost:9093" (required)
    pub brokers: String,

    /// Consumer group id (consumers only)
    pub group_id: String,

    /// Topic to subscribe to (consumers only, must be non-empty)
    pub topic: String,

    /// How long a send waits for a delivery confirmation (default: 2s)
    pub send_timeout: Duration,

    /// Bounded wait per consumer poll (default: 100ms)
    pub poll_interval: Duration,

    /// Log the outcome of every processed event (default: true)
    pub enable_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brokers: String::new(),
            group_id: String::new(),
            topic: String::new(),
            send_timeout: Duration::from_secs(2),
            poll_interval: Duration::from_millis(100),
            enable_logging: true,
        }
    }
}

impl Config {
    /// Create a new config with the given broker address
    pub fn new(brokers: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set consumer group id
    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    /// Builder pattern: set subscription topic
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Builder pattern: set send timeout
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Builder pattern: set poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder pattern: enable or disable per-event logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }
}
