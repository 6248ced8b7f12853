use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{TaskError, TaskId};
use super::repository::TaskRepository;
use super::service::{TaskService, TaskServiceError};
use crate::governance::extract::ApiQuery;
use crate::governance::repository::RepositoryError;
use crate::governance::systems::{SystemDirectory, SystemId};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TaskQuery {
    #[serde(default)]
    pub(crate) system_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CompleteRequest {
    #[serde(default)]
    pub(crate) evidence_link: Option<String>,
}

/// Governance task listing, completion, seeding and tracker import.
pub fn task_router<R, S>(service: Arc<TaskService<R, S>>) -> Router
where
    R: TaskRepository + 'static,
    S: SystemDirectory + 'static,
{
    Router::new()
        .route("/api/governance-tasks", get(list_handler::<R, S>))
        .route(
            "/api/governance-tasks/:id",
            get(get_handler::<R, S>).patch(complete_handler::<R, S>),
        )
        .route(
            "/api/v1/systems/:system_id/governance-tasks",
            post(seed_handler::<R, S>),
        )
        .route(
            "/api/v1/systems/:system_id/governance-tasks/summary",
            get(summary_handler::<R, S>),
        )
        .route(
            "/api/v1/systems/:system_id/governance-tasks/import",
            post(import_handler::<R, S>),
        )
        .with_state(service)
}

fn error_response(error: TaskServiceError) -> Response {
    let status = match &error {
        TaskServiceError::UnknownSystem(_) => StatusCode::NOT_FOUND,
        TaskServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        TaskServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        TaskServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        TaskServiceError::Task(TaskError::Blocked { .. }) => StatusCode::CONFLICT,
        TaskServiceError::Task(TaskError::InvalidEvidenceLink(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TaskServiceError::Import(_) => StatusCode::BAD_REQUEST,
    };
    let message = match &error {
        TaskServiceError::Repository(RepositoryError::NotFound) => "task not found".to_string(),
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, TaskServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, S>(
    State(service): State<Arc<TaskService<R, S>>>,
    ApiQuery(query): ApiQuery<TaskQuery>,
) -> Response
where
    R: TaskRepository + 'static,
    S: SystemDirectory + 'static,
{
    match query.system_id {
        Some(system_id) => respond(StatusCode::OK, service.list(&SystemId(system_id))),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "system_id query parameter is required" })),
        )
            .into_response(),
    }
}

pub(crate) async fn get_handler<R, S>(
    State(service): State<Arc<TaskService<R, S>>>,
    Path(id): Path<String>,
) -> Response
where
    R: TaskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(StatusCode::OK, service.get(&TaskId(id)))
}

pub(crate) async fn complete_handler<R, S>(
    State(service): State<Arc<TaskService<R, S>>>,
    Path(id): Path<String>,
    request: Option<Json<CompleteRequest>>,
) -> Response
where
    R: TaskRepository + 'static,
    S: SystemDirectory + 'static,
{
    let request = request.map(|Json(request)| request).unwrap_or_default();
    respond(
        StatusCode::OK,
        service.complete(&TaskId(id), request.evidence_link),
    )
}

pub(crate) async fn seed_handler<R, S>(
    State(service): State<Arc<TaskService<R, S>>>,
    Path(system_id): Path<String>,
) -> Response
where
    R: TaskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(StatusCode::CREATED, service.seed(&SystemId(system_id)))
}

pub(crate) async fn summary_handler<R, S>(
    State(service): State<Arc<TaskService<R, S>>>,
    Path(system_id): Path<String>,
) -> Response
where
    R: TaskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(StatusCode::OK, service.summary(&SystemId(system_id)))
}

pub(crate) async fn import_handler<R, S>(
    State(service): State<Arc<TaskService<R, S>>>,
    Path(system_id): Path<String>,
    body: String,
) -> Response
where
    R: TaskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(
        StatusCode::OK,
        service.import_status(&SystemId(system_id), body.as_bytes()),
    )
}
