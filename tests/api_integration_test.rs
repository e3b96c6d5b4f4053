// API integration tests that verify HTTP endpoints
// Tests the Axum router with in-process requests

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt; // For `.collect()`
use mockito::{Server, ServerGuard};
use serde_json::Value;
use tower::ServiceExt; // For `oneshot`

use bcv_indicators::api::{create_router, generate_openapi_spec, AppState};
use bcv_indicators::extract::VariationDirection;
use bcv_indicators::fetcher::RatesFetcher;
use bcv_indicators::services::RatesService;
use bcv_indicators::store::{
    IndicatorsDocument, IndicatorsRepository, LiquidityHistoryEntry, LiquidityLatest,
    RatesRepository,
};

fn app_state(dir: &std::path::Path, server: &ServerGuard) -> AppState {
    let fetcher = RatesFetcher::new(
        format!("{}/euro", server.url()),
        format!("{}/dolar", server.url()),
        format!("{}/paralelo", server.url()),
    );
    AppState {
        indicators_repo: IndicatorsRepository::new(dir),
        rates_service: RatesService::new(fetcher, RatesRepository::new(dir)),
    }
}

fn sample_document() -> IndicatorsDocument {
    IndicatorsDocument {
        last_updated: Utc.with_ymd_and_hms(2026, 1, 9, 12, 0, 0).unwrap(),
        latest: LiquidityLatest {
            date: "09/01/2026".to_string(),
            m1_billions: Some(80.5),
            m2_billions: Some(115.0),
            variation_pct: Some(-1.25),
            variation_direction: VariationDirection::Down,
        },
        history: vec![LiquidityHistoryEntry {
            date: "09/01/2026".to_string(),
            m2_billions: Some(115.0),
            variation_pct: Some(-1.25),
        }],
        base_monetaria: None,
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let server = Server::new_async().await;
    let app = create_router(app_state(dir.path(), &server));

    let (status, _, body) = get(app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_indicators_not_found_before_first_publish() {
    let dir = tempfile::tempdir().unwrap();
    let server = Server::new_async().await;
    let app = create_router(app_state(dir.path(), &server));

    let (status, _, _) = get(app, "/api/v1/indicators").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_indicators_returns_published_document() {
    let dir = tempfile::tempdir().unwrap();
    let server = Server::new_async().await;
    let state = app_state(dir.path(), &server);
    state.indicators_repo.save(&sample_document()).await.unwrap();

    let (status, _, body) = get(create_router(state), "/api/v1/indicators").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["latest"]["date"], "09/01/2026");
    assert_eq!(json["latest"]["variation_direction"], "down");
    assert_eq!(json["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_indicators_corrupt_file_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let server = Server::new_async().await;
    let state = app_state(dir.path(), &server);
    std::fs::write(state.indicators_repo.path(), "{not json").unwrap();

    let (status, _, _) = get(create_router(state), "/api/v1/indicators").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_live_rates_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = Server::new_async().await;
    let _euro = server
        .mock("GET", "/euro")
        .with_status(503)
        .create_async()
        .await;
    let _dolar = server
        .mock("GET", "/dolar")
        .with_status(200)
        .with_body(r#"{"tasa": "301,37", "fecha": "2026-01-09"}"#)
        .create_async()
        .await;
    let _paralelo = server
        .mock("GET", "/paralelo")
        .with_status(200)
        .with_body(r#"{"promedio": 520.5, "fechaActualizacion": "2026-01-09T10:00:00Z"}"#)
        .create_async()
        .await;

    let app = create_router(app_state(dir.path(), &server));
    let (status, headers, body) = get(app, "/api/v1/rates").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=300"
    );

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["eur"].is_null());
    assert_eq!(json["usd"]["rate"], 301.37);
    assert_eq!(json["usd"]["symbol"], "$");
    assert!(json["usd"].get("live").is_none());
    assert_eq!(json["usdt"]["live"], true);
    assert_eq!(json["usdt"]["date"], "2026-01-09");
}

#[test]
fn test_openapi_lists_endpoints() {
    let spec = generate_openapi_spec();
    let json = serde_json::to_value(&spec).unwrap();

    for path in ["/api/v1/health", "/api/v1/indicators", "/api/v1/rates"] {
        assert!(json["paths"].get(path).is_some(), "missing {path}");
    }
    assert!(json["components"]["schemas"].get("IndicatorsDocument").is_some());
}
