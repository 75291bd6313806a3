//! Push channels and the in-memory implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use super::{PublishError, Publisher, PushEvent};
use crate::locks::{read, write};

/// A real-time side-channel that browsers subscribe to.
///
/// Each receiver sees every event published after it was created. Events
/// published with no receiver are not queued.
pub trait PushChannel: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<PushEvent>;
}

/// In-memory push channel for testing and single-process scenarios.
///
/// Features:
/// - Clone-friendly (clones share the channel)
/// - Fan-out to every live subscriber via tokio `broadcast`
/// - Keeps an append-only log of everything published, for inspection
/// - Rejects publishes with [`PublishError::Closed`] after [`close`](Self::close)
///
/// ## Example
///
/// ```
/// use resource_browser::bus::{InMemoryChannel, Publisher, PushChannel, PushEvent};
/// use serde_json::json;
///
/// let channel = InMemoryChannel::new();
/// let mut rx = channel.subscribe();
///
/// channel.publish(PushEvent::new("evt-1", "order:created", json!({ "id": 7 }))).unwrap();
///
/// assert_eq!(rx.try_recv().unwrap().name, "order:created");
/// assert_eq!(channel.event_names(), vec!["order:created"]);
/// ```
#[derive(Clone)]
pub struct InMemoryChannel {
    sender: broadcast::Sender<PushEvent>,
    log: Arc<RwLock<Vec<PushEvent>>>,
    closed: Arc<AtomicBool>,
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// `capacity` bounds how far a slow subscriber may lag before it
    /// starts losing events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            log: Arc::new(RwLock::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get all events published so far.
    pub fn events(&self) -> Vec<PushEvent> {
        read(&self.log).clone()
    }

    /// Get all event names in order.
    pub fn event_names(&self) -> Vec<String> {
        read(&self.log).iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        read(&self.log).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.log).is_empty()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Stop accepting events. Existing subscribers keep what they received.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Clear the log (useful for test cleanup).
    pub fn clear(&self) {
        write(&self.log).clear();
    }
}

impl Publisher for InMemoryChannel {
    fn publish(&self, event: PushEvent) -> Result<(), PublishError> {
        if self.is_closed() {
            return Err(PublishError::Closed);
        }
        write(&self.log).push(event.clone());
        // No live subscribers is not an error: nobody is interested yet
        let _ = self.sender.send(event);
        Ok(())
    }
}

impl PushChannel for InMemoryChannel {
    fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.sender.subscribe()
    }
}
