//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Location store reachable
/// - **503 Service Unavailable**: Location store unreachable
///
/// A missing geocoding API key is reported as `"warning"` but does not
/// degrade the service: cached locations are still served.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Location store reachable" },
///     "geocoder": { "status": "ok", "message": "API key configured" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let geocoder_check = check_geocoder(&state);

    let healthy = store_check.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            geocoder: geocoder_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    if state.location_service.store_healthy().await {
        CheckStatus::new("ok", "Location store reachable")
    } else {
        CheckStatus::new("error", "Location store unreachable")
    }
}

fn check_geocoder(state: &AppState) -> CheckStatus {
    if state.location_service.geocoder_configured() {
        CheckStatus::new("ok", "API key configured")
    } else {
        CheckStatus::new("warning", "GOOGLE_MAPS_API_KEY is not set")
    }
}
