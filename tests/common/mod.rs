#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use geocode_cache::api::handlers::health_handler;
use geocode_cache::api::routes::location_routes;
use geocode_cache::domain::entities::LocationRecord;
use geocode_cache::domain::geocoder::{GeocodeError, GeocodeOutcome, Geocoder};
use geocode_cache::domain::repositories::{LocationRepository, StoreError};
use geocode_cache::infrastructure::cache::MemoryLocationStore;
use geocode_cache::state::AppState;
use geocode_cache::utils::location_key::{LocationKey, normalize_location};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const OAKLAND_INPUT: &str = "  7th West, Oakland, CA";
pub const OAKLAND_KEY: &str = "7th west, oakland, ca";
pub const OAKLAND_ADDRESS: &str = "7th West, Oakland, CA 94607, USA";
pub const OAKLAND_LAT: f64 = 37.77493;
pub const OAKLAND_LNG: f64 = -122.251686;

pub fn key(raw: &str) -> LocationKey {
    normalize_location(raw).unwrap()
}

pub fn oakland_record() -> LocationRecord {
    LocationRecord::found(key(OAKLAND_KEY), OAKLAND_ADDRESS, OAKLAND_LAT, OAKLAND_LNG).unwrap()
}

/// Geocoder that replays queued answers in order and counts calls.
///
/// Once the queue is drained every call answers [`GeocodeOutcome::NoResults`].
pub struct ScriptedGeocoder {
    responses: Mutex<VecDeque<Result<GeocodeOutcome, GeocodeError>>>,
    calls: AtomicUsize,
    configured: bool,
}

impl ScriptedGeocoder {
    pub fn new(responses: Vec<Result<GeocodeOutcome, GeocodeError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            configured: true,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, _key: &LocationKey) -> Result<GeocodeOutcome, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(GeocodeOutcome::NoResults))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

/// Store whose backend is permanently unreachable.
pub struct UnreachableStore;

#[async_trait]
impl LocationRepository for UnreachableStore {
    async fn get(&self, _key: &LocationKey) -> Result<Option<LocationRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn put(&self, _record: &LocationRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &LocationKey) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

pub fn create_test_state(
    store: Arc<dyn LocationRepository>,
    geocoder: Arc<dyn Geocoder>,
) -> AppState {
    AppState::new(store, geocoder)
}

pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .merge(location_routes())
        .route("/health", get(health_handler))
        .with_state(state)
}

/// App over a fresh in-memory store; returns handles to both test doubles.
pub fn create_memory_app(
    responses: Vec<Result<GeocodeOutcome, GeocodeError>>,
) -> (Router, Arc<MemoryLocationStore>, Arc<ScriptedGeocoder>) {
    let store = Arc::new(MemoryLocationStore::new());
    let geocoder = Arc::new(ScriptedGeocoder::new(responses));
    let state = create_test_state(store.clone(), geocoder.clone());

    (create_test_app(state), store, geocoder)
}
