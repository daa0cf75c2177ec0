//! Fan-out of notification events to the mail dispatcher.
//!
//! Events are published only after the notification row is committed.

use chrono::{DateTime, Utc};
use khayroukum_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// One per notification row written for a user.
pub const EVENT_NOTIFICATION_CREATED: &str = "notification.created";

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// e.g. `"notification.created"`.
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    /// `user_id`, `title` and `message` for notification events.
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn payload_id(&self, field: &str) -> Option<DbId> {
        self.payload.get(field).and_then(serde_json::Value::as_i64)
    }

    pub fn payload_str(&self, field: &str) -> Option<&str> {
        self.payload.get(field).and_then(serde_json::Value::as_str)
    }
}

/// Shared as `Arc<EventBus>` in the API state.
///
/// Slow receivers that fall more than the channel capacity behind see
/// `RecvError::Lagged` and skip the dropped events.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Dropped when nobody subscribes, e.g. with mail delivery disabled.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_enriched_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            PlatformEvent::new(EVENT_NOTIFICATION_CREATED)
                .with_source("notification", 12)
                .with_payload(serde_json::json!({"user_id": 5, "title": "Projet validé"})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, EVENT_NOTIFICATION_CREATED);
        assert_eq!(received.source_entity_type.as_deref(), Some("notification"));
        assert_eq!(received.source_entity_id, Some(12));
        assert_eq!(received.payload_id("user_id"), Some(5));
        assert_eq!(received.payload_str("title"), Some("Projet validé"));
    }

    #[tokio::test]
    async fn every_subscriber_gets_a_copy() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(PlatformEvent::new("contact.recu"));

        assert_eq!(rx1.recv().await.unwrap().event_type, "contact.recu");
        assert_eq!(rx2.recv().await.unwrap().event_type, "contact.recu");
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new("orphan.event"));
    }

    #[test]
    fn payload_accessors_ignore_wrong_types() {
        let event = PlatformEvent::new("x").with_payload(serde_json::json!({"user_id": "five"}));
        assert_eq!(event.payload_id("user_id"), None);
        assert_eq!(event.payload_str("missing"), None);
    }
}
