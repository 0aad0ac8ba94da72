//! Producer side of the broker client
//!
//! Publishing is asynchronous at the broker layer: the confirmation arrives
//! out-of-band, so every send races it against the configured deadline and
//! yields exactly one outcome per call.

use crate::broker::{BrokerConnection, BrokerConnector};
use crate::{Config, Error, Message, Result, delivery};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::info;

/// A producer that publishes messages and confirms delivery under a deadline
pub struct Producer {
    config: Config,
    connector: Arc<dyn BrokerConnector>,
    conn: Mutex<Option<Arc<dyn BrokerConnection>>>,
}

impl Producer {
    /// Create a new producer.
    ///
    /// Fails if the broker address is empty or the send timeout is zero.
    pub fn new(connector: Arc<dyn BrokerConnector>, config: Config) -> Result<Self> {
        if config.brokers.is_empty() {
            return Err(Error::Config("broker address must not be empty".into()));
        }
        if config.send_timeout.is_zero() {
            return Err(Error::Config("send timeout must not be zero".into()));
        }

        Ok(Self {
            config,
            connector,
            conn: Mutex::new(None),
        })
    }

    /// Establish the broker connection. Must be called before [`send`](Self::send).
    pub async fn connect(&self) -> Result<()> {
        let conn = self.connector.connect(&self.config).await?;
        *self.conn.lock() = Some(conn);
        Ok(())
    }

    /// Publish a message, racing the delivery confirmation against the
    /// configured timeout.
    ///
    /// Non-blocking: the race runs on a spawned task and the returned
    /// [`SendReceipt`] resolves with exactly one outcome. Called before a
    /// successful [`connect`](Self::connect), the receipt resolves with
    /// [`Error::NotConnected`] without contacting the broker.
    ///
    /// A [`Error::DeliveryTimeout`] outcome does not imply the message was
    /// not delivered; the confirmation may still arrive after the deadline,
    /// in which case it is logged and discarded.
    pub fn send(
        &self,
        topic: impl Into<String>,
        key: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
    ) -> SendReceipt {
        let (tx, rx) = oneshot::channel();
        let receipt = SendReceipt { rx };

        let Some(conn) = self.conn.lock().clone() else {
            let _ = tx.send(Err(Error::NotConnected));
            return receipt;
        };

        let message = Message::new(topic, key, payload);
        let timeout = self.config.send_timeout;

        tokio::spawn(async move {
            let topic = message.topic.clone();
            let bytes = message.payload.len();
            let (handle, confirmation) = delivery::channel();

            if let Err(err) = conn.publish(message, handle).await {
                let _ = tx.send(Err(err));
                return;
            }

            let outcome = confirmation.wait(timeout).await;
            if outcome.is_ok() {
                info!(topic, bytes, "message delivered");
            }
            let _ = tx.send(outcome);
        });

        receipt
    }

    /// Release the broker connection.
    ///
    /// Safe to call once all in-flight sends are expected to have completed;
    /// in-flight races are not cancelled.
    pub async fn close(&self) {
        if let Some(conn) = self.conn.lock().take() {
            conn.close().await;
        }
    }
}

/// Single-shot notification of a send outcome
#[derive(Debug)]
pub struct SendReceipt {
    rx: oneshot::Receiver<Result<()>>,
}

impl Future for SendReceipt {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|outcome| match outcome {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::ConfirmationDropped),
        })
    }
}
