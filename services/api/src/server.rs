use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use risko::config::AppConfig;
use risko::error::AppError;
use risko::service::{build_engine, partner_access};
use risko::{telemetry, RiskService};
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAnalysisRepository};
use crate::routes::with_operational_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(build_engine(&config)?);
    let service = Arc::new(RiskService::new(
        engine,
        Arc::new(InMemoryAnalysisRepository::default()),
        partner_access(&config),
    ));

    let app = with_operational_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        geocoder = ?config.geocoding.provider,
        fallback = ?config.scoring.fallback_mode,
        "risk scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
