//! API route configuration.

use crate::api::handlers::{delete_location_handler, get_location_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Location routes.
///
/// # Endpoints
///
/// - `GET    /location/{location}` - Resolve a location to coordinates
/// - `DELETE /location/{location}` - Remove a cached resolution
pub fn location_routes() -> Router<AppState> {
    Router::new().route(
        "/location/{location}",
        get(get_location_handler).delete(delete_location_handler),
    )
}
