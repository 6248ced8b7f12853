use crate::cli::ServeArgs;
use crate::infra::{demo_systems, AppState, GovernanceServices};
use crate::routes::with_governance_routes;
use ai_governance::config::AppConfig;
use ai_governance::error::AppError;
use ai_governance::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = GovernanceServices::in_memory(demo_systems());
    let systems = services.systems.all().len();

    let app = with_governance_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        systems,
        site = %config.backend.site_url,
        backend = %config.backend.backend_url,
        "ai governance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
