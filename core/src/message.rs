//! Message and envelope types

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message published to or polled from the broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Topic the message belongs to
    pub topic: String,

    /// Partitioning key (may be empty)
    #[serde(default)]
    pub key: Vec<u8>,

    /// Raw payload bytes
    pub payload: Vec<u8>,

    /// When the message was created
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(
        topic: impl Into<String>,
        key: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            topic: topic.into(),
            key: key.into(),
            payload: payload.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a message with a JSON-serialized payload
    pub fn with_json<T: Serialize>(
        topic: impl Into<String>,
        key: impl Into<Vec<u8>>,
        payload: &T,
    ) -> Result<Self> {
        let json = serde_json::to_vec(payload)?;
        Ok(Self::new(topic, key, json))
    }
}

/// The decoded shape of an inbound payload.
///
/// Only `name` is interpreted; every other field of the JSON document is
/// opaque to the consumer and reaches the handler as raw bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// Event kind, used for handler lookup
    pub name: String,
}

impl Envelope {
    /// Decode an envelope from raw payload bytes
    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(payload)?)
    }
}
