//! Error types for eventcraft-core

use thiserror::Error;

/// Boxed error returned by event handlers
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in eventcraft-core
#[derive(Error, Debug)]
pub enum Error {
    /// Operation attempted before a successful connect
    #[error("not connected: call connect() first")]
    NotConnected,

    /// Broker connection could not be established or subscription failed
    #[error("broker connection failed: {0}")]
    Connection(String),

    /// Event processor started while a loop is already running
    #[error("event processor is already running")]
    AlreadyRunning,

    /// Lifecycle operation attempted after stop
    #[error("consumer is stopped")]
    Stopped,

    /// Broker synchronously refused a publish
    #[error("produce rejected: {0}")]
    ProduceRejected(String),

    /// Delivery confirmation did not arrive within the configured deadline.
    ///
    /// Does not imply the message was not delivered; a late confirmation is
    /// logged and discarded.
    #[error("message delivery timeout exceeded")]
    DeliveryTimeout,

    /// Broker reported a delivery failure
    #[error("message delivery failed: {0}")]
    DeliveryFailure(String),

    /// Confirmation channel closed without a report
    #[error("delivery confirmation channel closed")]
    ConfirmationDropped,

    /// Inbound payload is not a valid event envelope
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// No handler registered for the decoded event name
    #[error("event handler [ {0} ] does not exist")]
    UnknownHandler(String),

    /// The invoked handler returned an error
    #[error("handler error: {0}")]
    Handler(#[source] BoxError),

    /// Broker-level error surfaced during polling
    #[error("broker error [code {code}]: {description}")]
    Broker { code: i32, description: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
