//! Handlers for location lookup and invalidation.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::api::dto::location::LocationResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Response header reporting whether the answer came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Resolves a location to coordinates.
///
/// # Endpoint
///
/// `GET /location/{location}`
///
/// # Response
///
/// ```json
/// {
///   "location": "7th west, oakland, ca",
///   "full_address": "7th West, Oakland, CA 94607, USA",
///   "latitude": 37.77493,
///   "longitude": -122.251686,
///   "status": "found"
/// }
/// ```
///
/// The `x-cache` header is `hit` when served from the cache, `miss` when the
/// geocoding API was queried.
///
/// # Errors
///
/// Returns 400 Bad Request if the location is shorter than 2 characters after
/// trimming.
/// Returns 404 Not Found if the location is cached as not found, the geocoding
/// API has no result, or the geocoding API call failed.
pub async fn get_location_handler(
    Path(location): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let resolved = state.location_service.resolve(&location).await?;

    Ok((
        [(CACHE_STATUS_HEADER, resolved.source.as_str())],
        Json(LocationResponse::from(&resolved.record)),
    ))
}

/// Removes a cached location so the next lookup queries the geocoding API.
///
/// # Endpoint
///
/// `DELETE /location/{location}`
///
/// # Errors
///
/// Returns 404 Not Found if nothing was cached for the location.
/// Returns 400 Bad Request if the location is shorter than 2 characters.
/// Returns 500 Internal Server Error if the store is unreachable.
pub async fn delete_location_handler(
    Path(location): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let deleted = state.location_service.delete(&location).await?;

    if !deleted {
        return Err(AppError::not_found(
            "location not found",
            json!({ "location": location }),
        ));
    }

    Ok(StatusCode::OK)
}
