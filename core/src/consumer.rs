//! Consumer side of the broker client
//!
//! Runs a single sequential poll loop: polling and handler invocation are
//! not parallelized, so at most one handler executes at a time per consumer
//! and a slow handler delays the next poll.

use crate::broker::{BrokerConnection, BrokerConnector, BrokerEvent};
use crate::message::Envelope;
use crate::registry::HandlerRegistry;
use crate::{Config, Error, Message, Result};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{debug, info, warn};

/// Consumer lifecycle state.
///
/// `Stopped` is terminal; no other state is reachable from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConsumerState {
    Created = 0,
    Connected = 1,
    Running = 2,
    Stopped = 3,
}

impl ConsumerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Created,
            1 => Self::Connected,
            2 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

/// A consumer that polls a subscribed topic and dispatches decoded events
/// to registered handlers
pub struct Consumer {
    config: Config,
    connector: Arc<dyn BrokerConnector>,
    conn: Mutex<Option<Arc<dyn BrokerConnection>>>,
    handlers: RwLock<Arc<HandlerRegistry>>,
    state: AtomicU8,
}

impl Consumer {
    /// Create a new consumer
    pub fn new(connector: Arc<dyn BrokerConnector>, config: Config) -> Self {
        Self {
            config,
            connector,
            conn: Mutex::new(None),
            handlers: RwLock::new(Arc::new(HandlerRegistry::new())),
            state: AtomicU8::new(ConsumerState::Created as u8),
        }
    }

    /// Open the broker connection and subscribe to the configured topic.
    ///
    /// Any failure leaves the state at `Created`; a half-open connection is
    /// torn down before the error is returned.
    pub async fn connect(&self) -> Result<()> {
        if self.config.topic.is_empty() {
            return Err(Error::Config("topic must not be empty".into()));
        }
        match self.state() {
            ConsumerState::Created => {}
            ConsumerState::Stopped => return Err(Error::Stopped),
            _ => return Err(Error::Config("already connected".into())),
        }

        let conn = self.connector.connect(&self.config).await?;
        if let Err(err) = conn.subscribe(std::slice::from_ref(&self.config.topic)).await {
            conn.close().await;
            return Err(err);
        }
        *self.conn.lock() = Some(conn);

        if self
            .state
            .compare_exchange(
                ConsumerState::Created as u8,
                ConsumerState::Connected as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            // stop() raced us and may have missed the connection stored above
            if let Some(conn) = self.conn.lock().take() {
                conn.close().await;
            }
            return Err(Error::Stopped);
        }

        info!(topic = %self.config.topic, group = %self.config.group_id, "consumer connected");
        Ok(())
    }

    /// Install the handler registry, replacing any previous one in full.
    ///
    /// Safe to call while the event processor is running: the loop captures
    /// a consistent snapshot of the registry once per dispatch.
    pub fn set_handlers(&self, registry: HandlerRegistry) {
        *self.handlers.write() = Arc::new(registry);
    }

    /// Run the poll loop until [`stop`](Self::stop) is observed.
    ///
    /// Every per-message failure (decode, missing handler, handler error,
    /// broker error event) is reported and the loop continues; only the
    /// transition to `Stopped` ends processing. On exit the underlying
    /// connection is closed exactly once.
    pub async fn event_processor(&self) -> Result<()> {
        self.state
            .compare_exchange(
                ConsumerState::Connected as u8,
                ConsumerState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|actual| match ConsumerState::from_u8(actual) {
                ConsumerState::Running => Error::AlreadyRunning,
                ConsumerState::Created => Error::NotConnected,
                _ => Error::Stopped,
            })?;

        let Some(conn) = self.conn.lock().clone() else {
            self.state.store(ConsumerState::Stopped as u8, Ordering::Release);
            return Err(Error::NotConnected);
        };

        info!(topic = %self.config.topic, "event processor started");

        while self.state.load(Ordering::Acquire) == ConsumerState::Running as u8 {
            let Some(event) = conn.poll(self.config.poll_interval).await else {
                continue;
            };

            let outcome = self.process(event);
            if self.config.enable_logging {
                match &outcome {
                    Ok(()) => debug!("event processed"),
                    Err(err) => warn!(error = %err, "event processing failed"),
                }
            }
        }

        let conn = self.conn.lock().take();
        if let Some(conn) = conn {
            conn.close().await;
        }
        info!("event processor stopped");
        Ok(())
    }

    /// Idempotently transition to `Stopped`.
    ///
    /// Safe to call from any state and from any task; a running loop exits
    /// before its next poll (an executing handler is never interrupted) and
    /// closes the connection itself.
    pub async fn stop(&self) {
        let prev = self.state.swap(ConsumerState::Stopped as u8, Ordering::AcqRel);
        if prev != ConsumerState::Running as u8 {
            // No loop exists to release the connection
            if let Some(conn) = self.conn.lock().take() {
                conn.close().await;
            }
        }
    }

    /// Get the current lifecycle state
    pub fn state(&self) -> ConsumerState {
        ConsumerState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn process(&self, event: BrokerEvent) -> Result<()> {
        match event {
            BrokerEvent::Message(message) => self.dispatch(&message),
            BrokerEvent::Error { code, description } => Err(Error::Broker { code, description }),
        }
    }

    fn dispatch(&self, message: &Message) -> Result<()> {
        let envelope = Envelope::decode(&message.payload)?;
        let registry = self.handlers.read().clone();
        let handler = registry
            .get(&envelope.name)
            .ok_or_else(|| Error::UnknownHandler(envelope.name.clone()))?;
        handler(&message.payload).map_err(Error::Handler)
    }
}
