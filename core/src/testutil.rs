//! In-memory broker double for tests
//!
//! Stands in for a real broker cluster: scripted inbound events, a
//! configurable confirmation delay/outcome for publishes, and counters for
//! the assertions the unit tests make.

use crate::broker::{BrokerConnection, BrokerConnector, BrokerEvent};
use crate::delivery::{DeliveryHandle, DeliveryReport};
use crate::{Config, Error, Message, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) struct MockBroker {
    confirm_delay: Mutex<Duration>,
    report: Mutex<DeliveryReport>,
    reject: Mutex<Option<String>>,
    fail_subscribe: AtomicBool,
    published: Mutex<Vec<Message>>,
    events: Mutex<VecDeque<BrokerEvent>>,
    subscriptions: Mutex<Vec<String>>,
    closes: AtomicUsize,
}

impl MockBroker {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            confirm_delay: Mutex::new(Duration::ZERO),
            report: Mutex::new(DeliveryReport::Delivered),
            reject: Mutex::new(None),
            fail_subscribe: AtomicBool::new(false),
            published: Mutex::new(Vec::new()),
            events: Mutex::new(VecDeque::new()),
            subscriptions: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
        })
    }

    /// Delay delivery confirmations by the given duration
    pub(crate) fn confirm_after(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        *self.confirm_delay.lock() = delay;
        self
    }

    /// Confirm every publish with a delivery failure
    pub(crate) fn failing_delivery(self: Arc<Self>, reason: &str) -> Arc<Self> {
        *self.report.lock() = DeliveryReport::Failed(reason.into());
        self
    }

    /// Refuse every publish synchronously
    pub(crate) fn rejecting(self: Arc<Self>, reason: &str) -> Arc<Self> {
        *self.reject.lock() = Some(reason.into());
        self
    }

    /// Fail every subscribe call
    pub(crate) fn failing_subscribe(self: Arc<Self>) -> Arc<Self> {
        self.fail_subscribe.store(true, Ordering::SeqCst);
        self
    }

    /// Queue an inbound message for the next polls
    pub(crate) fn push_message(&self, topic: &str, payload: Vec<u8>) {
        self.events
            .lock()
            .push_back(BrokerEvent::Message(Message::new(topic, b"key".to_vec(), payload)));
    }

    /// Queue a broker-level error event
    pub(crate) fn push_error(&self, code: i32, description: &str) {
        self.events.lock().push_back(BrokerEvent::Error {
            code,
            description: description.into(),
        });
    }

    pub(crate) fn published(&self) -> Vec<Message> {
        self.published.lock().clone()
    }

    pub(crate) fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().clone()
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrokerConnection for MockBroker {
    async fn publish(&self, message: Message, confirmation: DeliveryHandle) -> Result<()> {
        if let Some(reason) = self.reject.lock().clone() {
            return Err(Error::ProduceRejected(reason));
        }

        self.published.lock().push(message);

        let delay = *self.confirm_delay.lock();
        let report = self.report.lock().clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            confirmation.resolve(report);
        });

        Ok(())
    }

    async fn poll(&self, max_wait: Duration) -> Option<BrokerEvent> {
        if let Some(event) = self.events.lock().pop_front() {
            return Some(event);
        }
        tokio::time::sleep(max_wait).await;
        self.events.lock().pop_front()
    }

    async fn subscribe(&self, topics: &[String]) -> Result<()> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(Error::Connection("subscribe refused".into()));
        }
        self.subscriptions.lock().extend_from_slice(topics);
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) struct MockConnector {
    broker: Arc<MockBroker>,
    fail: Option<String>,
}

impl MockConnector {
    /// Connector that hands out the given broker
    pub(crate) fn to(broker: &Arc<MockBroker>) -> Arc<Self> {
        Arc::new(Self {
            broker: broker.clone(),
            fail: None,
        })
    }

    /// Connector whose connect always fails
    pub(crate) fn failing(broker: &Arc<MockBroker>, reason: &str) -> Arc<Self> {
        Arc::new(Self {
            broker: broker.clone(),
            fail: Some(reason.into()),
        })
    }
}

#[async_trait]
impl BrokerConnector for MockConnector {
    async fn connect(&self, _config: &Config) -> Result<Arc<dyn BrokerConnection>> {
        if let Some(reason) = &self.fail {
            return Err(Error::Connection(reason.clone()));
        }
        Ok(self.broker.clone())
    }
}
