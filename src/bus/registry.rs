use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type SessionId = Uuid;

/// The set of currently connected observer sessions.
///
/// Each session is keyed by a transport-level id, not a user identity; the
/// same user connected twice is two sessions. The registry holds only the
/// send half of each session's outbound channel, never entity state.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, mpsc::UnboundedSender<String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session and return its id. Called by the transport layer when a
    /// connection is established.
    pub fn register(&self, sender: mpsc::UnboundedSender<String>) -> SessionId {
        let id = Uuid::new_v4();
        self.sessions.insert(id, sender);
        tracing::debug!(session = %id, connected = self.sessions.len(), "session registered");
        id
    }

    /// Remove a session. Called by the transport layer on disconnect; a
    /// second call for the same id is a no-op.
    pub fn unregister(&self, id: &SessionId) {
        self.sessions.remove(id);
        tracing::debug!(session = %id, connected = self.sessions.len(), "session unregistered");
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Send `message` to every registered session. A send failure means the
    /// receiving half is gone (the connection is closing); that session is
    /// skipped without affecting delivery to the others.
    pub(super) fn send_to_all(&self, message: &str) {
        for entry in self.sessions.iter() {
            if entry.value().send(message.to_string()).is_err() {
                tracing::debug!(session = %entry.key(), "skipping closed session");
            }
        }
    }
}
