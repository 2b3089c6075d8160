//! Integration tests for the synchronization core.
//!
//! These exercise the full mutation → commit → broadcast path against an
//! in-memory store with real registered sessions.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::bus::{Broadcaster, SessionRegistry};
use crate::db::{seed, Database};
use crate::service::SyncService;



/// A wired-up backend over a fresh seeded in-memory store.
pub struct TestBackend {
    pub service: Arc<SyncService>,
    pub registry: Arc<SessionRegistry>,
}

pub fn test_backend() -> TestBackend {
    let db = Arc::new(Database::open_in_memory().expect("in-memory DB"));
    seed::seed_initial_users(&db).expect("seed users");
    let registry = Arc::new(SessionRegistry::new());
    let broadcaster = Arc::new(Broadcaster::new(registry.clone()));
    let service = Arc::new(SyncService::new(db, broadcaster));
    TestBackend { service, registry }
}

/// Register a new observer session, returning the receive half.
pub fn connect(registry: &SessionRegistry) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    registry.register(tx);
    rx
}

/// Pop the next pending notification and parse it.
pub fn next_notification(rx: &mut mpsc::UnboundedReceiver<String>) -> serde_json::Value {
    let raw = rx.try_recv().expect("expected a notification");
    serde_json::from_str(&raw).expect("notification is valid JSON")
}
