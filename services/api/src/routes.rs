use crate::infra::{AppState, GovernanceServices};
use ai_governance::governance::assessment::assessment_router;
use ai_governance::governance::identity::identity_router;
use ai_governance::governance::risk::risk_router;
use ai_governance::governance::tasks::task_router;
use ai_governance::governance::AiSystem;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;

pub(crate) fn with_governance_routes(services: GovernanceServices) -> Router {
    let systems = services.systems.all();

    assessment_router(services.assessments)
        .merge(risk_router(services.risks))
        .merge(task_router(services.tasks))
        .merge(identity_router())
        .route(
            "/api/v1/systems",
            get(move || systems_endpoint(systems.clone())),
        )
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn systems_endpoint(systems: Vec<AiSystem>) -> Json<serde_json::Value> {
    Json(json!({ "systems": systems }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
