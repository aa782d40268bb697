mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use geocode_cache::infrastructure::cache::MemoryLocationStore;
use std::sync::Arc;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (app, _store, _geocoder) = common::create_memory_app(vec![]);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["geocoder"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let (app, _store, _geocoder) = common::create_memory_app(vec![]);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("checks").is_some());
    assert!(json["checks"].get("store").is_some());
    assert!(json["checks"].get("geocoder").is_some());
}

#[tokio::test]
async fn test_health_missing_api_key_is_warning() {
    let state = common::create_test_state(
        Arc::new(MemoryLocationStore::new()),
        Arc::new(common::ScriptedGeocoder::unconfigured()),
    );
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["geocoder"]["status"], "warning");
    assert_eq!(
        json["checks"]["geocoder"]["message"],
        "GOOGLE_MAPS_API_KEY is not set"
    );
}

#[tokio::test]
async fn test_health_store_unreachable() {
    let state = common::create_test_state(
        Arc::new(common::UnreachableStore),
        Arc::new(common::ScriptedGeocoder::new(vec![])),
    );
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["store"]["status"], "error");
}
