//! View events for change notifications
//!
//! The EventBus decouples collection loading and mutations from whoever needs
//! to know about them (a status bar, a toast, a sibling view that depends on
//! the same data). It uses `tokio::sync::broadcast`.
//!
//! ```text
//! ViewHandle::refresh() ──┐
//! ViewHandle::delete()  ──┼──▶ EventBus::publish() ──▶ broadcast channel ──▶ subscribers
//! ViewHandle::update()  ──┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = EventBus::new(256);
//! let mut rx = bus.subscribe();
//!
//! bus.publish(ViewEvent::Reloaded { collection: "ranches".into(), count: 12 });
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("{} {}", envelope.event.collection(), envelope.event.action());
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Something that happened to a collection view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ViewEvent {
    /// A fresh copy of the collection was applied
    Reloaded { collection: String, count: usize },
    /// Loading failed; the previous data is still shown
    ReloadFailed { collection: String, message: String },
    /// A reload finished after a newer one was requested and was dropped
    StaleDiscarded { collection: String, generation: u64 },
    /// A record was deleted through the source
    Deleted { collection: String, id: String },
    /// A record was updated through the source
    Updated { collection: String, id: String },
    /// A delete or update was rejected by the source
    MutationFailed {
        collection: String,
        id: String,
        message: String,
    },
}

impl ViewEvent {
    /// Name of the collection this event relates to
    pub fn collection(&self) -> &str {
        match self {
            ViewEvent::Reloaded { collection, .. }
            | ViewEvent::ReloadFailed { collection, .. }
            | ViewEvent::StaleDiscarded { collection, .. }
            | ViewEvent::Deleted { collection, .. }
            | ViewEvent::Updated { collection, .. }
            | ViewEvent::MutationFailed { collection, .. } => collection,
        }
    }

    /// Action name, matching the serialized `action` tag
    pub fn action(&self) -> &str {
        match self {
            ViewEvent::Reloaded { .. } => "reloaded",
            ViewEvent::ReloadFailed { .. } => "reload_failed",
            ViewEvent::StaleDiscarded { .. } => "stale_discarded",
            ViewEvent::Deleted { .. } => "deleted",
            ViewEvent::Updated { .. } => "updated",
            ViewEvent::MutationFailed { .. } => "mutation_failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ViewEvent::ReloadFailed { .. } | ViewEvent::MutationFailed { .. }
        )
    }
}

/// Envelope wrapping a view event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: ViewEvent,
}

impl EventEnvelope {
    pub fn new(event: ViewEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone (Arc internally) and shareable across tasks.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Receivers that fall more than `capacity` events behind get a
    /// `Lagged` error on their next `recv()`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails; with no subscribers the event is dropped. Returns the
    /// number of receivers that got it.
    pub fn publish(&self, event: ViewEvent) -> usize {
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
