//! Broker capability surface
//!
//! The wire protocol, partitioning and persistence of the broker are out of
//! scope; this crate coordinates on top of whatever implements these traits.

use crate::delivery::DeliveryHandle;
use crate::{Config, Message, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// An event returned by a single broker poll
#[derive(Debug, Clone)]
pub enum BrokerEvent {
    /// A message arrived on a subscribed topic
    Message(Message),

    /// A broker-level error was surfaced during polling
    Error { code: i32, description: String },
}

/// An established connection to a broker
#[async_trait]
pub trait BrokerConnection: Send + Sync + 'static {
    /// Submit a message for asynchronous publication.
    ///
    /// A synchronous refusal (e.g. malformed topic) is returned as `Err`;
    /// otherwise the eventual outcome is reported through `confirmation`.
    async fn publish(&self, message: Message, confirmation: DeliveryHandle) -> Result<()>;

    /// Wait up to `max_wait` for the next event. `None` means nothing arrived.
    async fn poll(&self, max_wait: Duration) -> Option<BrokerEvent>;

    /// Subscribe to the given topics
    async fn subscribe(&self, topics: &[String]) -> Result<()>;

    /// Release the connection
    async fn close(&self);
}

/// Factory for broker connections
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    /// Establish a connection using the configured broker address
    async fn connect(&self, config: &Config) -> Result<Arc<dyn BrokerConnection>>;
}
