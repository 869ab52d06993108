//! End-to-end scenarios for address analysis through the public service facade and HTTP router.
//!
//! External geocoding is stubbed to fail so every scenario exercises the city-table and centroid
//! fallbacks deterministically.

mod common {
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};

    use risko::analyses::AnalysisId;
    use risko::scoring::{
        AnalysisResult, Coordinate, FallbackMode, GeocodeError, Geocoder, GeocoderSettings,
        GeocodingProvider, RiskEngine, ZoneTables,
    };
    use risko::{AnalysisRecord, AnalysisRepository, PartnerAccess, RepositoryError, RiskService};

    pub(super) const PARTNER_KEY: &str = "demo-api-key-123";

    /// Provider whose every request fails at the transport layer.
    #[derive(Debug, Default)]
    pub(super) struct FailingProvider;

    impl GeocodingProvider for FailingProvider {
        async fn search(&self, _query: &str) -> Result<Option<Coordinate>, GeocodeError> {
            Err(GeocodeError::Transport("network unreachable".to_string()))
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryRepository {
        records: Mutex<Vec<AnalysisRecord>>,
    }

    impl MemoryRepository {
        pub(super) fn len(&self) -> usize {
            self.records.lock().expect("records mutex poisoned").len()
        }
    }

    impl AnalysisRepository for MemoryRepository {
        fn insert(
            &self,
            owner_id: &str,
            result: AnalysisResult,
            created_at: DateTime<Utc>,
        ) -> Result<AnalysisRecord, RepositoryError> {
            let mut records = self.records.lock().expect("records mutex poisoned");
            let record = AnalysisRecord {
                id: AnalysisId(records.len() as u64 + 1),
                owner_id: owner_id.to_string(),
                created_at,
                result,
            };
            records.push(record.clone());
            Ok(record)
        }

        fn for_owner(&self, owner_id: &str) -> Result<Vec<AnalysisRecord>, RepositoryError> {
            let records = self.records.lock().expect("records mutex poisoned");
            Ok(records
                .iter()
                .rev()
                .filter(|record| record.owner_id == owner_id)
                .cloned()
                .collect())
        }

        fn all(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
            Ok(self.records.lock().expect("records mutex poisoned").clone())
        }
    }

    pub(super) struct UnavailableRepository;

    impl AnalysisRepository for UnavailableRepository {
        fn insert(
            &self,
            _owner_id: &str,
            _result: AnalysisResult,
            _created_at: DateTime<Utc>,
        ) -> Result<AnalysisRecord, RepositoryError> {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        }

        fn for_owner(&self, _owner_id: &str) -> Result<Vec<AnalysisRecord>, RepositoryError> {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        }

        fn all(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        }
    }

    pub(super) fn engine(strict: bool) -> RiskEngine<FailingProvider> {
        let settings = GeocoderSettings {
            strict,
            ..GeocoderSettings::default()
        };
        RiskEngine::new(
            Geocoder::new(FailingProvider, settings),
            Arc::new(ZoneTables::turkey()),
            FallbackMode::Midpoint,
        )
    }

    pub(super) fn service_with<R>(repository: Arc<R>) -> Arc<RiskService<FailingProvider, R>>
    where
        R: AnalysisRepository + 'static,
    {
        Arc::new(RiskService::new(
            Arc::new(engine(false)),
            repository,
            PartnerAccess::new([PARTNER_KEY], 100),
        ))
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;
use risko::risk_router;
use risko::scoring::{Coordinate, Hazard, RiskLevel, COUNTRY_CENTROID};

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn istanbul_resolves_from_city_table_and_scores_high_earthquake_risk() {
    let result = engine(false)
        .analyze("Istanbul, Turkey", Some(50))
        .await
        .expect("analysis succeeds");

    assert_eq!(result.address, "Istanbul, Turkey");
    assert_eq!(result.building_age, Some(50));
    assert_eq!(result.coordinate(), Some(Coordinate::new(41.0082, 28.9784)));
    assert!((60.0..=95.0).contains(&result.scores.earthquake));
    assert!(result.error.is_none());
    assert_eq!(
        result.risk_level,
        RiskLevel::from_score(result.overall_risk_score)
    );
}

#[tokio::test]
async fn unknown_address_uses_country_centroid() {
    let result = engine(false)
        .analyze("Some Unknown Address", None)
        .await
        .expect("analysis succeeds");

    assert_eq!(result.coordinate(), Some(COUNTRY_CENTROID));
    assert!((20.0..=50.0).contains(&result.scores.earthquake));
    assert!((5.0..=30.0).contains(&result.scores.landslide));
}

#[tokio::test]
async fn strict_mode_reports_unresolved_result() {
    let result = engine(true)
        .analyze("Some Unknown Address", Some(12))
        .await
        .expect("unresolved is not an error");

    assert!(!result.is_resolved());
    assert_eq!(result.risk_level, RiskLevel::Unknown);
    assert_eq!(result.overall_risk_score, 0.0);
    assert_eq!(result.error.as_deref(), Some("Could not geocode address"));
}

#[tokio::test]
async fn older_buildings_never_lower_fire_risk() {
    let engine = engine(false);
    let mut previous = 0.0;
    for age in [0, 10, 25, 40, 60, 90] {
        let result = engine
            .analyze("Ankara", Some(age))
            .await
            .expect("analysis succeeds");
        let fire = result.scores.get(Hazard::Fire);
        assert!(fire >= previous, "fire risk dropped at age {age}");
        previous = fire;
    }
}

#[tokio::test]
async fn analyze_route_returns_flat_result_and_persists_it() {
    let repository = Arc::new(MemoryRepository::default());
    let router = risk_router(service_with(repository.clone()));

    let response = router
        .oneshot(post_json(
            "/api/v1/risk/analyze",
            json!({ "address": "Izmir, Turkey", "building_age": 30 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    for field in [
        "earthquake_risk",
        "flood_risk",
        "fire_risk",
        "landslide_risk",
        "overall_risk_score",
        "risk_level",
    ] {
        assert!(payload.get(field).is_some(), "missing {field}");
    }
    assert_eq!(payload["building_age"], 30);
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn blank_address_is_bad_request() {
    let router = risk_router(service_with(Arc::new(MemoryRepository::default())));

    let response = router
        .oneshot(post_json("/api/v1/risk/analyze", json!({ "address": " " })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_route_still_answers_when_storage_is_down() {
    let router = risk_router(service_with(Arc::new(UnavailableRepository)));

    let response = router
        .oneshot(post_json(
            "/api/v1/risk/analyze",
            json!({ "address": "Bursa" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["address"], "Bursa");
}

#[tokio::test]
async fn unavailable_repository_maps_to_service_unavailable_on_reads() {
    let router = risk_router(service_with(Arc::new(UnavailableRepository)));

    let request = Request::get("/api/v1/b2b/analyses")
        .header("x-api-key", PARTNER_KEY)
        .body(Body::empty())
        .expect("request builds");
    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json(response).await;
    assert!(payload["error"].as_str().is_some());
}

#[tokio::test]
async fn visualize_route_returns_geojson_and_heat_layers() {
    let router = risk_router(service_with(Arc::new(MemoryRepository::default())));

    let response = router
        .oneshot(post_json(
            "/api/v1/risk/visualize",
            json!({ "address": "Trabzon" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["risk_map_data"]["type"], "FeatureCollection");
    for layer in ["earthquake", "flood", "fire", "landslide"] {
        assert!(
            payload["heat_map_layers"][layer].is_array(),
            "missing {layer}"
        );
    }
}

#[tokio::test]
async fn detailed_route_bundles_recommendations() {
    let router = risk_router(service_with(Arc::new(MemoryRepository::default())));

    let response = router
        .oneshot(post_json(
            "/api/v1/risk/analyze/detailed",
            json!({ "address": "Istanbul" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert!(payload["recommendations"].is_array());
    assert_eq!(payload["prevention_tips"].as_array().map(Vec::len), Some(8));
    assert!(payload["risk_score"]["earthquake_risk"].is_number());
}

#[tokio::test]
async fn batch_route_requires_api_key() {
    let router = risk_router(service_with(Arc::new(MemoryRepository::default())));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/b2b/batch-analyze",
            json!([{ "address": "Istanbul, Turkey" }]),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await["error"], "API key required");

    let mut request = post_json(
        "/api/v1/b2b/batch-analyze",
        json!([{ "address": "Istanbul, Turkey" }]),
    );
    request
        .headers_mut()
        .insert("x-api-key", "wrong".parse().expect("header value"));
    let response = router.oneshot(request).await.expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await["error"], "Invalid API key");
}

#[tokio::test]
async fn batch_route_returns_list_and_feeds_statistics() {
    let repository = Arc::new(MemoryRepository::default());
    let router = risk_router(service_with(repository.clone()));

    let mut request = post_json(
        "/api/v1/b2b/batch-analyze",
        json!([
            { "address": "Istanbul, Turkey" },
            { "address": "Ankara, Turkey" }
        ]),
    );
    request
        .headers_mut()
        .insert("x-api-key", PARTNER_KEY.parse().expect("header value"));
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));
    assert_eq!(repository.len(), 2);

    let request = Request::get("/api/v1/b2b/risk-statistics?region=Istanbul")
        .header("x-api-key", PARTNER_KEY)
        .body(Body::empty())
        .expect("request builds");
    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let stats = read_json(response).await;
    assert_eq!(stats["region"], "Istanbul");
    assert_eq!(stats["total_analyzed_addresses"], 1);
}

#[tokio::test]
async fn oversized_batch_is_rejected() {
    let router = risk_router(service_with(Arc::new(MemoryRepository::default())));
    let addresses: Vec<Value> = (0..101)
        .map(|i| json!({ "address": format!("Konya {i}") }))
        .collect();

    let mut request = post_json("/api/v1/b2b/batch-analyze", Value::Array(addresses));
    request
        .headers_mut()
        .insert("x-api-key", PARTNER_KEY.parse().expect("header value"));
    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
