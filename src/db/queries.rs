use rusqlite::params;
use serde::Serialize;

use super::{Database, DbError};

// ---------------------------------------------------------------------------
// Row types — flat structs that map directly to table columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Credential-free projection of a user, safe to hand to any caller.
#[derive(Debug, Clone, Serialize)]
pub struct VolunteerRow {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub organizer_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskRow {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub status: String,
}

/// Task joined with its parent event's title, as served to listing callers.
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithEventRow {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub status: String,
    pub event_title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementRow {
    pub id: String,
    pub event_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// User queries
// ---------------------------------------------------------------------------

pub fn insert_user(db: &Database, row: &UserRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO users (id, email, name, role) VALUES (?1, ?2, ?3, ?4)",
        params![row.id, row.email, row.name, row.role],
    )?;
    Ok(())
}

pub fn get_user_by_email(db: &Database, email: &str) -> Result<Option<UserRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare("SELECT id, email, name, role FROM users WHERE email = ?1")?;
    let mut rows = stmt.query_map(params![email], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role: row.get(3)?,
        })
    })?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn count_users(db: &Database) -> Result<i64, DbError> {
    let conn = db.conn();
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

pub fn list_volunteers(db: &Database) -> Result<Vec<VolunteerRow>, DbError> {
    let conn = db.conn();
    let mut stmt =
        conn.prepare("SELECT id, name, email FROM users WHERE role = 'volunteer' ORDER BY name")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(VolunteerRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Event queries
// ---------------------------------------------------------------------------

pub fn insert_event(db: &Database, row: &EventRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO events (id, title, description, date, location, status, organizer_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            row.id,
            row.title,
            row.description,
            row.date,
            row.location,
            row.status,
            row.organizer_id,
        ],
    )?;
    Ok(())
}

pub fn get_event(db: &Database, id: &str) -> Result<Option<EventRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT id, title, description, date, location, status, organizer_id
         FROM events WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id], |row| {
        Ok(EventRow {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            date: row.get(3)?,
            location: row.get(4)?,
            status: row.get(5)?,
            organizer_id: row.get(6)?,
        })
    })?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn list_events(db: &Database) -> Result<Vec<EventRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT id, title, description, date, location, status, organizer_id FROM events",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                date: row.get(3)?,
                location: row.get(4)?,
                status: row.get(5)?,
                organizer_id: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Task queries
// ---------------------------------------------------------------------------

pub fn insert_task(db: &Database, row: &TaskRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO tasks (id, event_id, title, description, assigned_to, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            row.id,
            row.event_id,
            row.title,
            row.description,
            row.assigned_to,
            row.status,
        ],
    )?;
    Ok(())
}

pub fn get_task(db: &Database, id: &str) -> Result<Option<TaskRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT id, event_id, title, description, assigned_to, status FROM tasks WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id], |row| {
        Ok(TaskRow {
            id: row.get(0)?,
            event_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            assigned_to: row.get(4)?,
            status: row.get(5)?,
        })
    })?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn list_tasks(db: &Database) -> Result<Vec<TaskWithEventRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT t.id, t.event_id, t.title, t.description, t.assigned_to, t.status,
                e.title AS event_title
         FROM tasks t JOIN events e ON t.event_id = e.id",
    )?;
    let rows = stmt
        .query_map([], map_task_with_event)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_tasks_assigned_to(
    db: &Database,
    user_id: &str,
) -> Result<Vec<TaskWithEventRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT t.id, t.event_id, t.title, t.description, t.assigned_to, t.status,
                e.title AS event_title
         FROM tasks t JOIN events e ON t.event_id = e.id
         WHERE t.assigned_to = ?1",
    )?;
    let rows = stmt
        .query_map(params![user_id], map_task_with_event)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_task_with_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskWithEventRow> {
    Ok(TaskWithEventRow {
        id: row.get(0)?,
        event_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        assigned_to: row.get(4)?,
        status: row.get(5)?,
        event_title: row.get(6)?,
    })
}

pub fn update_task_status(db: &Database, id: &str, status: &str) -> Result<(), DbError> {
    let conn = db.conn();
    let changed = conn.execute(
        "UPDATE tasks SET status = ?1 WHERE id = ?2",
        params![status, id],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("task {id}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Announcement queries
// ---------------------------------------------------------------------------

pub fn insert_announcement(db: &Database, row: &AnnouncementRow) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO announcements (id, event_id, content, type, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![row.id, row.event_id, row.content, row.kind, row.created_at],
    )?;
    Ok(())
}

pub fn get_announcement(db: &Database, id: &str) -> Result<Option<AnnouncementRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT id, event_id, content, type, created_at FROM announcements WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id], |row| {
        Ok(AnnouncementRow {
            id: row.get(0)?,
            event_id: row.get(1)?,
            content: row.get(2)?,
            kind: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Newest first; rowid breaks ties between same-timestamp inserts.
pub fn list_announcements(db: &Database) -> Result<Vec<AnnouncementRow>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "SELECT id, event_id, content, type, created_at
         FROM announcements
         ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(AnnouncementRow {
                id: row.get(0)?,
                event_id: row.get(1)?,
                content: row.get(2)?,
                kind: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
