//! Thin HTTP/WebSocket gateway.
//!
//! Routes requests to the mutation service and upgrades `/ws` connections
//! into registered push sessions. No business logic lives here; the gateway
//! only translates transport concerns (extractors, status codes, socket
//! lifecycle) to and from the service layer.

pub(crate) mod handlers;
mod ws;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::bus::SessionRegistry;
use crate::db::DbError;
use crate::service::{ServiceError, SyncService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SyncService>,
    pub registry: Arc<SessionRegistry>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(handlers::login))
        .route(
            "/api/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/tasks/{id}", patch(handlers::update_task_status))
        .route(
            "/api/announcements",
            get(handlers::list_announcements).post(handlers::create_announcement),
        )
        .route("/api/volunteers", get(handlers::list_volunteers))
        .route("/ws", get(ws::upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) | ServiceError::Db(DbError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Db(DbError::DuplicateKey(_))
            | ServiceError::Db(DbError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {err}");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
