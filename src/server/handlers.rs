use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::db::queries;
use crate::service::{CreateAnnouncement, CreateEvent, CreateTask, ServiceError};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<queries::UserRow>, ApiError> {
    match state.service.login(&req.email) {
        Ok(user) => Ok(Json(user)),
        // An unknown email is an auth failure at this endpoint, not a 404.
        Err(ServiceError::NotFound(_)) => Err(ApiError::unauthorized("user not found")),
        Err(err) => Err(err.into()),
    }
}

pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<queries::EventRow>>, ApiError> {
    Ok(Json(state.service.list_events()?))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEvent>,
) -> Result<Json<queries::EventRow>, ApiError> {
    Ok(Json(state.service.create_event(payload)?))
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<queries::TaskWithEventRow>>, ApiError> {
    let tasks = state
        .service
        .list_tasks(query.user_id.as_deref(), query.role.as_deref())?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTask>,
) -> Result<Json<queries::TaskRow>, ApiError> {
    Ok(Json(state.service.create_task(payload)?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub status: String,
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> Result<Json<queries::TaskRow>, ApiError> {
    Ok(Json(state.service.update_task_status(&task_id, &req.status)?))
}

pub async fn list_announcements(
    State(state): State<AppState>,
) -> Result<Json<Vec<queries::AnnouncementRow>>, ApiError> {
    Ok(Json(state.service.list_announcements()?))
}

pub async fn create_announcement(
    State(state): State<AppState>,
    Json(payload): Json<CreateAnnouncement>,
) -> Result<Json<queries::AnnouncementRow>, ApiError> {
    Ok(Json(state.service.create_announcement(payload)?))
}

pub async fn list_volunteers(
    State(state): State<AppState>,
) -> Result<Json<Vec<queries::VolunteerRow>>, ApiError> {
    Ok(Json(state.service.list_volunteers()?))
}
