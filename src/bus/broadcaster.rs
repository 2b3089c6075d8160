use std::sync::Arc;

use serde::Serialize;

use super::SessionRegistry;

/// Operation tag carried on the wire, e.g. `"TASK_UPDATED"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    EventCreated,
    TaskAssigned,
    TaskUpdated,
    Announcement,
}

/// A single committed mutation, as pushed to every session:
/// `{"type": "...", "payload": <row as persisted>}`.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub payload: serde_json::Value,
}

impl Notification {
    pub fn new<T: Serialize>(kind: NotificationKind, payload: &T) -> Self {
        Self {
            kind,
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Fans a notification out to every session in the registry.
pub struct Broadcaster {
    registry: Arc<SessionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Serialize `notification` once and deliver it to every session
    /// currently registered. Closed sessions are skipped silently; nothing
    /// is acknowledged, retried, or queued for later delivery.
    pub fn publish(&self, notification: &Notification) {
        let message = match serde_json::to_string(notification) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("failed to serialize notification: {e}");
                return;
            }
        };
        tracing::debug!(
            kind = ?notification.kind,
            sessions = self.registry.len(),
            "broadcasting notification"
        );
        self.registry.send_to_all(&message);
    }
}
