use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::analyses::AnalysisRepository;
use crate::error::AppError;
use crate::scoring::GeocodingProvider;
use crate::service::{AnalyzeRequest, RiskService, RiskServiceError};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Public and partner analysis endpoints.
pub fn risk_router<P, R>(service: Arc<RiskService<P, R>>) -> Router
where
    P: GeocodingProvider + 'static,
    R: AnalysisRepository + 'static,
{
    Router::new()
        .route("/api/v1/risk/analyze", post(analyze_handler::<P, R>))
        .route(
            "/api/v1/risk/analyze/detailed",
            post(detailed_handler::<P, R>),
        )
        .route("/api/v1/risk/visualize", post(visualize_handler::<P, R>))
        .route("/api/v1/b2b/batch-analyze", post(batch_handler::<P, R>))
        .route("/api/v1/b2b/premium-analyze", post(premium_handler::<P, R>))
        .route(
            "/api/v1/b2b/risk-statistics",
            get(statistics_handler::<P, R>),
        )
        .route("/api/v1/b2b/analyses", get(analyses_handler::<P, R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    pub region: Option<String>,
}

fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
}

fn ok<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn failure(err: RiskServiceError) -> Response {
    let err = AppError::from(err);
    if err.status().is_server_error() {
        error!(error = %err, "risk request failed");
    }
    err.into_response()
}

pub(crate) async fn analyze_handler<P, R>(
    State(service): State<Arc<RiskService<P, R>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    P: GeocodingProvider + 'static,
    R: AnalysisRepository + 'static,
{
    match service.analyze(&request).await {
        Ok(result) => ok(result),
        Err(err) => failure(err),
    }
}

pub(crate) async fn detailed_handler<P, R>(
    State(service): State<Arc<RiskService<P, R>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    P: GeocodingProvider + 'static,
    R: AnalysisRepository + 'static,
{
    match service.detailed(&request).await {
        Ok(report) => ok(report),
        Err(err) => failure(err),
    }
}

pub(crate) async fn visualize_handler<P, R>(
    State(service): State<Arc<RiskService<P, R>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    P: GeocodingProvider + 'static,
    R: AnalysisRepository + 'static,
{
    match service.visualize(&request).await {
        Ok(view) => ok(view),
        Err(err) => failure(err),
    }
}

pub(crate) async fn batch_handler<P, R>(
    State(service): State<Arc<RiskService<P, R>>>,
    headers: HeaderMap,
    Json(requests): Json<Vec<AnalyzeRequest>>,
) -> Response
where
    P: GeocodingProvider + 'static,
    R: AnalysisRepository + 'static,
{
    match service.batch_analyze(api_key(&headers), &requests).await {
        Ok(results) => ok(results),
        Err(err) => failure(err),
    }
}

pub(crate) async fn premium_handler<P, R>(
    State(service): State<Arc<RiskService<P, R>>>,
    headers: HeaderMap,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    P: GeocodingProvider + 'static,
    R: AnalysisRepository + 'static,
{
    match service.premium_analyze(api_key(&headers), &request).await {
        Ok(report) => ok(report),
        Err(err) => failure(err),
    }
}

pub(crate) async fn statistics_handler<P, R>(
    State(service): State<Arc<RiskService<P, R>>>,
    headers: HeaderMap,
    Query(query): Query<StatisticsQuery>,
) -> Response
where
    P: GeocodingProvider + 'static,
    R: AnalysisRepository + 'static,
{
    match service.statistics(api_key(&headers), query.region.as_deref()) {
        Ok(stats) => ok(stats),
        Err(err) => failure(err),
    }
}

pub(crate) async fn analyses_handler<P, R>(
    State(service): State<Arc<RiskService<P, R>>>,
    headers: HeaderMap,
) -> Response
where
    P: GeocodingProvider + 'static,
    R: AnalysisRepository + 'static,
{
    match service.analyses(api_key(&headers)) {
        Ok(records) => ok(records),
        Err(err) => failure(err),
    }
}
