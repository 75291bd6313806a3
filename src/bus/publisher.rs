//! Push events and the publisher trait.

use serde_json::Value;
use thiserror::Error;

/// A named event pushed from the server side-channel.
#[derive(Clone, Debug, PartialEq)]
pub struct PushEvent {
    /// Unique identifier for this event
    pub id: String,
    /// Event name (e.g., "order:created", "review:reply:added")
    pub name: String,
    /// JSON payload, carrying enough to decide relevance (e.g., a product slug)
    pub payload: Value,
    /// Optional metadata (correlation IDs, origin, etc.)
    pub metadata: Option<Vec<(String, String)>>,
}

impl PushEvent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            payload,
            metadata: None,
        }
    }

    /// Create an event with a JSON-serialized payload.
    pub fn encode<T: serde::Serialize>(
        id: impl Into<String>,
        name: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(id, name, serde_json::to_value(payload)?))
    }

    /// Decode the payload into a typed value.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }

    /// Add metadata to the event.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// A top-level payload field as text (strings verbatim, numbers formatted).
    pub fn payload_field(&self, key: &str) -> Option<String> {
        match self.payload.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Error type for publish operations.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The channel no longer accepts events
    #[error("channel closed")]
    Closed,
}

/// Trait for pushing events into a channel.
///
/// The server side of the invalidation bus; tests and local tools use it
/// to simulate server pushes.
pub trait Publisher: Send + Sync {
    /// Publish a single event.
    fn publish(&self, event: PushEvent) -> Result<(), PublishError>;

    /// Publish multiple events.
    ///
    /// Default implementation publishes events sequentially.
    fn publish_batch(&self, events: Vec<PushEvent>) -> Result<(), PublishError> {
        for event in events {
            self.publish(event)?;
        }
        Ok(())
    }
}
