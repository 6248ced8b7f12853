use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ReviewDecision, RiskAssessmentId, RiskDraft};
use super::repository::RiskRepository;
use super::service::{RiskService, RiskServiceError};
use crate::governance::extract::ApiJson;
use crate::governance::repository::RepositoryError;
use crate::governance::systems::{SystemDirectory, SystemId};

/// Risk assessment recording, review and system risk level endpoints.
pub fn risk_router<R, S>(service: Arc<RiskService<R, S>>) -> Router
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/systems/:system_id/risk-assessments",
            get(list_handler::<R, S>).post(create_handler::<R, S>),
        )
        .route(
            "/api/v1/systems/:system_id/risk-level",
            get(risk_level_handler::<R, S>),
        )
        .route(
            "/api/v1/risk-assessments/:id",
            get(get_handler::<R, S>).put(update_handler::<R, S>),
        )
        .route(
            "/api/v1/risk-assessments/:id/submit",
            post(submit_handler::<R, S>),
        )
        .route(
            "/api/v1/risk-assessments/:id/approve",
            post(approve_handler::<R, S>),
        )
        .route(
            "/api/v1/risk-assessments/:id/reject",
            post(reject_handler::<R, S>),
        )
        .route(
            "/api/v1/risk-assessments/:id/reopen",
            post(reopen_handler::<R, S>),
        )
        .with_state(service)
}

fn error_response(error: RiskServiceError) -> Response {
    let status = match &error {
        RiskServiceError::UnknownSystem(_) => StatusCode::NOT_FOUND,
        RiskServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RiskServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RiskServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        RiskServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
        RiskServiceError::LifecycleLocked(_)
        | RiskServiceError::EvidenceRequired
        | RiskServiceError::InvalidDraft(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let message = match &error {
        RiskServiceError::Repository(RepositoryError::NotFound) => {
            "risk assessment not found".to_string()
        }
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, RiskServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R, S>(
    State(service): State<Arc<RiskService<R, S>>>,
    Path(system_id): Path<String>,
    ApiJson(draft): ApiJson<RiskDraft>,
) -> Response
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(
        StatusCode::CREATED,
        service.create(&SystemId(system_id), draft),
    )
}

pub(crate) async fn list_handler<R, S>(
    State(service): State<Arc<RiskService<R, S>>>,
    Path(system_id): Path<String>,
) -> Response
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(StatusCode::OK, service.list(&SystemId(system_id)))
}

pub(crate) async fn risk_level_handler<R, S>(
    State(service): State<Arc<RiskService<R, S>>>,
    Path(system_id): Path<String>,
) -> Response
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(StatusCode::OK, service.overall_risk(&SystemId(system_id)))
}

pub(crate) async fn get_handler<R, S>(
    State(service): State<Arc<RiskService<R, S>>>,
    Path(id): Path<String>,
) -> Response
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(StatusCode::OK, service.get(&RiskAssessmentId(id)))
}

pub(crate) async fn update_handler<R, S>(
    State(service): State<Arc<RiskService<R, S>>>,
    Path(id): Path<String>,
    ApiJson(draft): ApiJson<RiskDraft>,
) -> Response
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(StatusCode::OK, service.update(&RiskAssessmentId(id), draft))
}

pub(crate) async fn submit_handler<R, S>(
    State(service): State<Arc<RiskService<R, S>>>,
    Path(id): Path<String>,
) -> Response
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(StatusCode::OK, service.submit(&RiskAssessmentId(id)))
}

pub(crate) async fn approve_handler<R, S>(
    State(service): State<Arc<RiskService<R, S>>>,
    Path(id): Path<String>,
    ApiJson(decision): ApiJson<ReviewDecision>,
) -> Response
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(
        StatusCode::OK,
        service.approve(&RiskAssessmentId(id), decision),
    )
}

pub(crate) async fn reject_handler<R, S>(
    State(service): State<Arc<RiskService<R, S>>>,
    Path(id): Path<String>,
    ApiJson(decision): ApiJson<ReviewDecision>,
) -> Response
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(
        StatusCode::OK,
        service.reject(&RiskAssessmentId(id), decision),
    )
}

pub(crate) async fn reopen_handler<R, S>(
    State(service): State<Arc<RiskService<R, S>>>,
    Path(id): Path<String>,
) -> Response
where
    R: RiskRepository + 'static,
    S: SystemDirectory + 'static,
{
    respond(StatusCode::OK, service.reopen(&RiskAssessmentId(id)))
}
