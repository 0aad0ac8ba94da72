//! # eventcraft-core
//!
//! Async broker client pair: a producer that publishes messages and
//! confirms delivery under a deadline, and a consumer that polls a
//! subscribed topic and dispatches decoded events to registered handlers.
//!
//! The broker itself is an external capability supplied through the
//! [`broker`] traits; this crate provides the coordination layered on top:
//! - Per-send confirmation-vs-timeout races with exactly one outcome
//! - A cooperative poll loop with an explicit lifecycle state machine
//! - Copy-on-write handler registry swaps, safe while the loop runs

pub mod broker;
pub mod config;
pub mod consumer;
pub mod delivery;
pub mod error;
pub mod message;
pub mod producer;
pub mod registry;

#[cfg(test)]
pub(crate) mod testutil;

pub use broker::{BrokerConnection, BrokerConnector, BrokerEvent};
pub use config::Config;
pub use consumer::{Consumer, ConsumerState};
pub use delivery::{DeliveryHandle, DeliveryReceipt, DeliveryReport};
pub use error::{BoxError, Error, Result};
pub use message::{Envelope, Message};
pub use producer::{Producer, SendReceipt};
pub use registry::{EventHandler, HandlerRegistry};
