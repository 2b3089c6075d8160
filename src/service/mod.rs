//! The mutation service: the only legitimate path to change entity state.
//!
//! Every mutating operation follows the same shape:
//! 1. validate payload shape and enumerated fields (`BadRequest` before the
//!    store is ever touched)
//! 2. write through the store (constraint failures surface as
//!    `DuplicateKey` / `ConstraintViolation`)
//! 3. re-read the committed row
//! 4. hand a typed notification to the broadcaster
//!
//! A notification is produced iff the commit succeeded; a failed write never
//! notifies. Read operations pass through to the store with no side effects.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::bus::{Broadcaster, Notification, NotificationKind};
use crate::db::{queries, Database, DbError};

pub const TASK_STATUSES: &[&str] = &["pending", "in-progress", "completed"];
pub const ANNOUNCEMENT_TYPES: &[&str] = &["info", "emergency"];

const ROLE_VOLUNTEER: &str = "volunteer";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Db(#[from] DbError),
}

// ---------------------------------------------------------------------------
// Request payloads. Entity ids are caller-supplied, never generated here.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub organizer_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub id: String,
    pub event_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnnouncement {
    pub id: String,
    pub event_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct SyncService {
    db: Arc<Database>,
    broadcaster: Arc<Broadcaster>,
}

impl SyncService {
    pub fn new(db: Arc<Database>, broadcaster: Arc<Broadcaster>) -> Self {
        Self { db, broadcaster }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    // -- reads --------------------------------------------------------------

    pub fn login(&self, email: &str) -> Result<queries::UserRow, ServiceError> {
        queries::get_user_by_email(&self.db, email)?
            .ok_or_else(|| ServiceError::NotFound(format!("user {email}")))
    }

    pub fn list_events(&self) -> Result<Vec<queries::EventRow>, ServiceError> {
        Ok(queries::list_events(&self.db)?)
    }

    /// Role-aware task listing: a volunteer sees only tasks assigned to their
    /// own id; any other caller sees the full list.
    pub fn list_tasks(
        &self,
        user_id: Option<&str>,
        role: Option<&str>,
    ) -> Result<Vec<queries::TaskWithEventRow>, ServiceError> {
        if role == Some(ROLE_VOLUNTEER) {
            let user_id = user_id
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    ServiceError::BadRequest("volunteer task listing requires a user id".to_string())
                })?;
            return Ok(queries::list_tasks_assigned_to(&self.db, user_id)?);
        }
        Ok(queries::list_tasks(&self.db)?)
    }

    pub fn list_announcements(&self) -> Result<Vec<queries::AnnouncementRow>, ServiceError> {
        Ok(queries::list_announcements(&self.db)?)
    }

    pub fn list_volunteers(&self) -> Result<Vec<queries::VolunteerRow>, ServiceError> {
        Ok(queries::list_volunteers(&self.db)?)
    }

    // -- mutations ----------------------------------------------------------

    pub fn create_event(&self, payload: CreateEvent) -> Result<queries::EventRow, ServiceError> {
        require("id", &payload.id)?;
        require("title", &payload.title)?;
        require("organizer_id", &payload.organizer_id)?;

        queries::insert_event(
            &self.db,
            &queries::EventRow {
                id: payload.id.clone(),
                title: payload.title,
                description: payload.description,
                date: payload.date,
                location: payload.location,
                status: "active".to_string(),
                organizer_id: payload.organizer_id,
            },
        )?;

        let row = queries::get_event(&self.db, &payload.id)?
            .ok_or_else(|| ServiceError::NotFound(format!("event {}", payload.id)))?;
        self.broadcaster
            .publish(&Notification::new(NotificationKind::EventCreated, &row));
        Ok(row)
    }

    pub fn create_task(&self, payload: CreateTask) -> Result<queries::TaskRow, ServiceError> {
        require("id", &payload.id)?;
        require("event_id", &payload.event_id)?;
        require("title", &payload.title)?;
        let assigned_to = payload
            .assigned_to
            .filter(|value| !value.trim().is_empty());

        queries::insert_task(
            &self.db,
            &queries::TaskRow {
                id: payload.id.clone(),
                event_id: payload.event_id,
                title: payload.title,
                description: payload.description,
                assigned_to,
                status: "pending".to_string(),
            },
        )?;

        let row = queries::get_task(&self.db, &payload.id)?
            .ok_or_else(|| ServiceError::NotFound(format!("task {}", payload.id)))?;
        self.broadcaster
            .publish(&Notification::new(NotificationKind::TaskAssigned, &row));
        Ok(row)
    }

    /// Transitions are unconstrained: any status may move to any other,
    /// including back to `pending`. Only set membership is checked.
    pub fn update_task_status(
        &self,
        task_id: &str,
        status: &str,
    ) -> Result<queries::TaskRow, ServiceError> {
        require("task id", task_id)?;
        require_one_of("status", status, TASK_STATUSES)?;

        queries::update_task_status(&self.db, task_id, status)?;

        let row = queries::get_task(&self.db, task_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("task {task_id}")))?;
        self.broadcaster
            .publish(&Notification::new(NotificationKind::TaskUpdated, &row));
        Ok(row)
    }

    pub fn create_announcement(
        &self,
        payload: CreateAnnouncement,
    ) -> Result<queries::AnnouncementRow, ServiceError> {
        require("id", &payload.id)?;
        require("event_id", &payload.event_id)?;
        require("content", &payload.content)?;
        require_one_of("type", &payload.kind, ANNOUNCEMENT_TYPES)?;

        queries::insert_announcement(
            &self.db,
            &queries::AnnouncementRow {
                id: payload.id.clone(),
                event_id: payload.event_id,
                content: payload.content,
                kind: payload.kind,
                created_at: Utc::now().to_rfc3339(),
            },
        )?;

        let row = queries::get_announcement(&self.db, &payload.id)?
            .ok_or_else(|| ServiceError::NotFound(format!("announcement {}", payload.id)))?;
        self.broadcaster
            .publish(&Notification::new(NotificationKind::Announcement, &row));
        Ok(row)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::BadRequest(format!(
            "missing required field: {field}"
        )));
    }
    Ok(())
}

fn require_one_of(
    field: &'static str,
    value: &str,
    allowed: &[&str],
) -> Result<(), ServiceError> {
    if !allowed.contains(&value) {
        return Err(ServiceError::BadRequest(format!(
            "invalid {field}: {value:?} (expected one of {allowed:?})"
        )));
    }
    Ok(())
}
