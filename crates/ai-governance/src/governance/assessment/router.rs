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

use super::domain::{AssessmentMode, FormValues};
use super::repository::{AssessmentRepository, DraftId};
use super::service::{AssessmentService, AssessmentServiceError, SubmissionRequest};
use crate::governance::regulation::Regulation;
use crate::governance::extract::{ApiJson, ApiQuery};
use crate::governance::repository::RepositoryError;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ModeQuery {
    #[serde(default)]
    pub(crate) mode: AssessmentMode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidateRequest {
    pub(crate) mode: AssessmentMode,
    pub(crate) values: FormValues,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftRequest {
    pub(crate) regulation: Regulation,
    pub(crate) mode: AssessmentMode,
    pub(crate) values: FormValues,
}

/// Questionnaire, validation, submission and draft endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments/:regulation/questions",
            get(questions_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:regulation/sections",
            get(sections_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:regulation/validate",
            post(validate_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:regulation/submissions",
            post(submit_handler::<R>),
        )
        .route(
            "/api/v1/assessments/drafts/:draft_id",
            get(draft_handler::<R>).put(save_draft_handler::<R>),
        )
        .with_state(service)
}

fn parse_regulation(raw: &str) -> Result<Regulation, Response> {
    raw.parse::<Regulation>().map_err(|err| {
        let payload = json!({ "error": err.to_string() });
        (StatusCode::BAD_REQUEST, Json(payload)).into_response()
    })
}

fn service_error_response(error: AssessmentServiceError) -> Response {
    match error {
        AssessmentServiceError::Validation(errors) => {
            let payload = json!({
                "error": errors.to_string(),
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        AssessmentServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "record not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        AssessmentServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "record already exists" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn questions_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(regulation): Path<String>,
    ApiQuery(query): ApiQuery<ModeQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let regulation = match parse_regulation(&regulation) {
        Ok(regulation) => regulation,
        Err(response) => return response,
    };

    let questions = service.registry(regulation).questions_for_mode(query.mode);
    let payload = json!({
        "regulation": regulation,
        "mode": query.mode,
        "questions": questions,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn sections_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(regulation): Path<String>,
    ApiQuery(query): ApiQuery<ModeQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let regulation = match parse_regulation(&regulation) {
        Ok(regulation) => regulation,
        Err(response) => return response,
    };

    let sections = service
        .registry(regulation)
        .sections_with_questions(query.mode);
    let payload = json!({
        "regulation": regulation,
        "mode": query.mode,
        "sections": sections,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn validate_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(regulation): Path<String>,
    ApiJson(request): ApiJson<ValidateRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let regulation = match parse_regulation(&regulation) {
        Ok(regulation) => regulation,
        Err(response) => return response,
    };

    match service.validate(regulation, request.mode, &request.values) {
        Ok(()) => (StatusCode::OK, Json(json!({ "valid": true }))).into_response(),
        Err(errors) => {
            let payload = json!({ "valid": false, "errors": errors });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(regulation): Path<String>,
    ApiJson(request): ApiJson<SubmissionRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let regulation = match parse_regulation(&regulation) {
        Ok(regulation) => regulation,
        Err(response) => return response,
    };

    match service.submit(regulation, request) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn save_draft_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(draft_id): Path<String>,
    ApiJson(request): ApiJson<DraftRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.save_draft(
        DraftId(draft_id),
        request.regulation,
        request.mode,
        request.values,
    ) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn draft_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(draft_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.draft(&DraftId(draft_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}
