//! Mutation service tests: boundary validation, notify-iff-commit, role
//! filtering.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use crate::bus::{Broadcaster, SessionRegistry};
use crate::db::{queries, seed, Database, DbError};
use crate::service::{
    CreateAnnouncement, CreateEvent, CreateTask, ServiceError, SyncService,
};

/// Service over a fresh in-memory store with the default users seeded
/// (`1` organizer, `2` volunteer, `3` participant).
fn setup() -> (SyncService, Arc<SessionRegistry>) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    seed::seed_initial_users(&db).unwrap();
    let registry = Arc::new(SessionRegistry::new());
    let broadcaster = Arc::new(Broadcaster::new(registry.clone()));
    (SyncService::new(db, broadcaster), registry)
}

fn connect(registry: &SessionRegistry) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    registry.register(tx);
    rx
}

fn recv_json(rx: &mut mpsc::UnboundedReceiver<String>) -> serde_json::Value {
    let raw = rx.try_recv().expect("expected a notification");
    serde_json::from_str(&raw).expect("notification is valid JSON")
}

fn sample_event(id: &str) -> CreateEvent {
    CreateEvent {
        id: id.to_string(),
        title: "Orientation Day".to_string(),
        description: Some("campus tour".to_string()),
        date: Some("2026-09-01".to_string()),
        location: Some("Main Hall".to_string()),
        organizer_id: "1".to_string(),
    }
}

fn sample_task(id: &str, event_id: &str, assigned_to: Option<&str>) -> CreateTask {
    CreateTask {
        id: id.to_string(),
        event_id: event_id.to_string(),
        title: "set up chairs".to_string(),
        description: None,
        assigned_to: assigned_to.map(str::to_string),
    }
}

#[test]
fn create_event_notifies_every_session_exactly_once() {
    let (service, registry) = setup();
    let mut rx_a = connect(&registry);
    let mut rx_b = connect(&registry);

    let row = service.create_event(sample_event("e1")).unwrap();
    assert_eq!(row.status, "active");

    for rx in [&mut rx_a, &mut rx_b] {
        let msg = recv_json(rx);
        assert_eq!(msg["type"], "EVENT_CREATED");
        assert_eq!(msg["payload"]["id"], "e1");
        assert_eq!(msg["payload"]["organizer_id"], "1");
        assert!(rx.try_recv().is_err(), "exactly one notification expected");
    }
}

#[test]
fn malformed_payload_never_reaches_the_store() {
    let (service, registry) = setup();
    let mut rx = connect(&registry);

    let mut payload = sample_event("e1");
    payload.title = "   ".to_string();
    let err = service.create_event(payload).unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)), "got {err:?}");

    assert!(service.list_events().unwrap().is_empty());
    assert!(rx.try_recv().is_err(), "no notification for a rejected payload");
}

#[test]
fn failed_write_produces_no_notification() {
    let (service, registry) = setup();
    let mut rx = connect(&registry);

    let err = service
        .create_task(sample_task("t1", "no-such-event", None))
        .unwrap_err();
    assert!(
        matches!(err, ServiceError::Db(DbError::ConstraintViolation(_))),
        "got {err:?}"
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn duplicate_event_id_fails_and_notifies_only_once() {
    let (service, registry) = setup();
    let mut rx = connect(&registry);

    service.create_event(sample_event("e1")).unwrap();
    let err = service.create_event(sample_event("e1")).unwrap_err();
    assert!(
        matches!(err, ServiceError::Db(DbError::DuplicateKey(_))),
        "got {err:?}"
    );

    assert_eq!(recv_json(&mut rx)["type"], "EVENT_CREATED");
    assert!(rx.try_recv().is_err());
    assert_eq!(service.list_events().unwrap().len(), 1);
}

#[test]
fn create_task_notifies_task_assigned() {
    let (service, registry) = setup();
    service.create_event(sample_event("e1")).unwrap();
    let mut rx = connect(&registry);

    let row = service
        .create_task(sample_task("t1", "e1", Some("2")))
        .unwrap();
    assert_eq!(row.status, "pending");
    assert_eq!(row.assigned_to.as_deref(), Some("2"));

    let msg = recv_json(&mut rx);
    assert_eq!(msg["type"], "TASK_ASSIGNED");
    assert_eq!(msg["payload"]["id"], "t1");
}

#[test]
fn update_task_status_persists_and_notifies() {
    let (service, registry) = setup();
    service.create_event(sample_event("e1")).unwrap();
    service
        .create_task(sample_task("t1", "e1", Some("2")))
        .unwrap();
    let mut rx = connect(&registry);

    let row = service.update_task_status("t1", "in-progress").unwrap();
    assert_eq!(row.status, "in-progress");

    let msg = recv_json(&mut rx);
    assert_eq!(msg["type"], "TASK_UPDATED");
    assert_eq!(msg["payload"]["id"], "t1");
    assert_eq!(msg["payload"]["status"], "in-progress");

    // Transitions are unconstrained: completed may move back to pending.
    service.update_task_status("t1", "completed").unwrap();
    let row = service.update_task_status("t1", "pending").unwrap();
    assert_eq!(row.status, "pending");
}

#[test]
fn update_task_status_rejects_unknown_status_before_the_store() {
    let (service, registry) = setup();
    service.create_event(sample_event("e1")).unwrap();
    service.create_task(sample_task("t1", "e1", None)).unwrap();
    let mut rx = connect(&registry);

    let err = service.update_task_status("t1", "archived").unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)), "got {err:?}");

    let tasks = service.list_tasks(None, None).unwrap();
    assert_eq!(tasks[0].status, "pending");
    assert!(rx.try_recv().is_err());
}

#[test]
fn update_missing_task_is_not_found() {
    let (service, registry) = setup();
    let mut rx = connect(&registry);

    let err = service.update_task_status("ghost", "completed").unwrap_err();
    assert!(
        matches!(err, ServiceError::Db(DbError::NotFound(_))),
        "got {err:?}"
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn volunteer_sees_only_own_tasks() {
    let (service, _registry) = setup();
    service.create_event(sample_event("e1")).unwrap();
    service
        .create_task(sample_task("t1", "e1", Some("2")))
        .unwrap();
    service
        .create_task(sample_task("t2", "e1", Some("3")))
        .unwrap();
    service.create_task(sample_task("t3", "e1", None)).unwrap();

    let mine = service.list_tasks(Some("2"), Some("volunteer")).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, "t1");
    assert_eq!(mine[0].event_title, "Orientation Day");

    // Any non-volunteer role sees everything, regardless of identity.
    assert_eq!(service.list_tasks(Some("2"), Some("organizer")).unwrap().len(), 3);
    assert_eq!(service.list_tasks(None, None).unwrap().len(), 3);

    assert!(service.list_tasks(Some("9"), Some("volunteer")).unwrap().is_empty());
}

#[test]
fn volunteer_listing_requires_a_user_id() {
    let (service, _registry) = setup();
    let err = service.list_tasks(None, Some("volunteer")).unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)), "got {err:?}");
}

#[test]
fn login_finds_seeded_user_and_rejects_unknown_email() {
    let (service, _registry) = setup();

    let admin = service.login("admin@college.edu").unwrap();
    assert_eq!(admin.id, "1");
    assert_eq!(admin.role, "organizer");

    let err = service.login("nobody@x.com").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "got {err:?}");
}

#[test]
fn announcement_requires_valid_type() {
    let (service, registry) = setup();
    service.create_event(sample_event("e1")).unwrap();
    let mut rx = connect(&registry);

    let err = service
        .create_announcement(CreateAnnouncement {
            id: "a1".to_string(),
            event_id: "e1".to_string(),
            content: "doors open at nine".to_string(),
            kind: "urgent".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)), "got {err:?}");
    assert!(service.list_announcements().unwrap().is_empty());
    assert!(rx.try_recv().is_err());
}

#[test]
fn announcements_are_listed_newest_first() {
    let (service, registry) = setup();
    service.create_event(sample_event("e1")).unwrap();
    let mut rx = connect(&registry);

    for (id, kind) in [("a1", "info"), ("a2", "emergency")] {
        service
            .create_announcement(CreateAnnouncement {
                id: id.to_string(),
                event_id: "e1".to_string(),
                content: format!("announcement {id}"),
                kind: kind.to_string(),
            })
            .unwrap();
        let msg = recv_json(&mut rx);
        assert_eq!(msg["type"], "ANNOUNCEMENT");
        assert_eq!(msg["payload"]["id"], id);
        assert_eq!(msg["payload"]["type"], kind);
    }

    let rows = service.list_announcements().unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a2", "a1"]);
}

#[test]
fn volunteer_directory_lists_seeded_volunteer() {
    let (service, _registry) = setup();
    let volunteers = service.list_volunteers().unwrap();
    assert_eq!(volunteers.len(), 1);
    assert_eq!(volunteers[0].email, "volunteer@college.edu");
}

#[test]
fn store_is_reachable_for_direct_queries() {
    let (service, _registry) = setup();
    assert_eq!(queries::count_users(service.db()).unwrap(), 3);
}
