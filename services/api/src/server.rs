use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredSource, InMemoryProfileRepository};
use crate::routes::profile_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use risk_advisor::config::AppConfig;
use risk_advisor::error::AppError;
use risk_advisor::telemetry;
use risk_advisor::workflows::profiling::{RiskProfileService, ScoringEngine};
use std::sync::atomic::Ordering;
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

    telemetry::init(&config.telemetry)?;

    let weights = config.advisor.weight_table()?;
    let directory = config.advisor.archetype_directory()?;
    let source = ConfiguredSource::from_path(config.advisor.holdings_path.clone());
    info!(
        questions = weights.len(),
        archetypes = directory.len(),
        universe = %source.describe(),
        "scoring configuration loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let profile_service = Arc::new(RiskProfileService::new(
        ScoringEngine::new(weights),
        directory,
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(source),
    ));

    let app = profile_router(profile_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "risk advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
