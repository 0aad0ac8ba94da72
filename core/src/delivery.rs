//! Single-resolution delivery confirmation
//!
//! A `channel()` pair carries exactly one [`DeliveryReport`] from the broker
//! to the sender. The receipt side races the report against a deadline,
//! which keeps the timeout logic testable independent of any broker.

use crate::{Error, Result};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

/// The broker-side outcome of a publish attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    /// The broker persisted the message
    Delivered,

    /// The broker reported a delivery failure
    Failed(String),
}

/// Resolving half of a confirmation channel.
///
/// `resolve` consumes the handle, so at most one report is ever written.
#[derive(Debug)]
pub struct DeliveryHandle {
    tx: oneshot::Sender<DeliveryReport>,
}

impl DeliveryHandle {
    /// Report the outcome of the publish attempt
    pub fn resolve(self, report: DeliveryReport) {
        // The waiter may already have timed out and gone away.
        let _ = self.tx.send(report);
    }
}

/// Waiting half of a confirmation channel
#[derive(Debug)]
pub struct DeliveryReceipt {
    rx: oneshot::Receiver<DeliveryReport>,
}

impl DeliveryReceipt {
    /// Wait for the report, bounded by `deadline`.
    ///
    /// A report that arrives within the deadline always wins the race. If
    /// the timer fires first the pending confirmation is handed to a
    /// detached task that logs the late report and discards it.
    pub async fn wait(mut self, deadline: Duration) -> Result<()> {
        tokio::select! {
            biased;

            report = &mut self.rx => match report {
                Ok(DeliveryReport::Delivered) => Ok(()),
                Ok(DeliveryReport::Failed(reason)) => Err(Error::DeliveryFailure(reason)),
                Err(_) => Err(Error::ConfirmationDropped),
            },
            _ = tokio::time::sleep(deadline) => {
                tokio::spawn(drain_late(self.rx));
                Err(Error::DeliveryTimeout)
            }
        }
    }
}

/// Create a confirmation channel pair
pub fn channel() -> (DeliveryHandle, DeliveryReceipt) {
    let (tx, rx) = oneshot::channel();
    (DeliveryHandle { tx }, DeliveryReceipt { rx })
}

async fn drain_late(rx: oneshot::Receiver<DeliveryReport>) {
    if let Ok(report) = rx.await {
        debug!(?report, "delivery confirmation arrived after deadline");
    }
}
