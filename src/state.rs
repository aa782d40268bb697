//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::LocationService;
use crate::domain::geocoder::Geocoder;
use crate::domain::repositories::LocationRepository;

/// State shared by all request handlers.
///
/// Built once at startup and cloned per request; clones share the same
/// store connection and HTTP client.
#[derive(Clone)]
pub struct AppState {
    pub location_service: Arc<LocationService>,
}

impl AppState {
    /// Wires a location service over the given store and geocoder.
    pub fn new(repository: Arc<dyn LocationRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            location_service: Arc::new(LocationService::new(repository, geocoder)),
        }
    }
}
