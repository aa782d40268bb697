//! Cache-aside location resolution service.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::LocationRecord;
use crate::domain::geocoder::{GeocodeOutcome, Geocoder};
use crate::domain::repositories::LocationRepository;
use crate::error::AppError;
use crate::utils::location_key::{LocationKey, normalize_location};

/// Where a successful resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Cache,
    Upstream,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "hit",
            Self::Upstream => "miss",
        }
    }
}

/// A successfully resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// The raw string supplied by the caller.
    pub input: String,
    pub record: LocationRecord,
    pub source: ResolutionSource,
}

/// Service resolving free-form locations to coordinates.
///
/// Sits between HTTP handlers, the location cache and the geocoding provider.
///
/// # Resolution Flow
///
/// 1. Normalize the input; too short → [`AppError::Validation`]
/// 2. Look up the cache:
///    - found record → return it
///    - not-found record → [`AppError::NotFound`] without calling the provider
///    - miss or store failure → continue
/// 3. Call the provider:
///    - result → cache it, return it
///    - no results → cache a not-found record, [`AppError::NotFound`]
///    - provider failure → cache nothing, [`AppError::NotFound`]
///
/// Cache writes are best-effort: a failed write is logged and never changes
/// the response.
pub struct LocationService {
    repository: Arc<dyn LocationRepository>,
    geocoder: Arc<dyn Geocoder>,
}

impl LocationService {
    /// Creates a new location service.
    pub fn new(repository: Arc<dyn LocationRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            repository,
            geocoder,
        }
    }

    /// Resolves a raw location string to coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the normalized input is shorter than
    /// 2 characters.
    /// Returns [`AppError::NotFound`] for cached negatives, fresh negatives and
    /// provider failures alike.
    pub async fn resolve(&self, raw: &str) -> Result<ResolvedLocation, AppError> {
        let key = normalize_location(raw)?;
        if key.as_str() != raw {
            debug!(input = raw, location = %key, "Location cleaned");
        }

        match self.lookup_cached(&key).await {
            Some(record) if record.is_found() => {
                debug!(location = %key, "Cache HIT");
                return Ok(ResolvedLocation {
                    input: raw.to_string(),
                    record,
                    source: ResolutionSource::Cache,
                });
            }
            Some(_) => {
                info!(location = %key, "Cache HIT (not found), skipping geocoding API");
                return Err(not_found(&key, "location not found"));
            }
            None => debug!(location = %key, "Cache MISS"),
        }

        match self.geocoder.geocode(&key).await {
            Ok(GeocodeOutcome::Found(record)) => {
                self.store_best_effort(&record).await;
                info!(location = %key, address = record.full_address(), "Resolved location");

                Ok(ResolvedLocation {
                    input: raw.to_string(),
                    record,
                    source: ResolutionSource::Upstream,
                })
            }
            Ok(GeocodeOutcome::NoResults) => {
                self.store_best_effort(&LocationRecord::not_found(key.clone()))
                    .await;
                info!(location = %key, "No geocoding results, cached as not found");

                Err(not_found(&key, "location not found from API"))
            }
            Err(e) => {
                warn!(location = %key, error = %e, "Geocoding failed, nothing cached");
                Err(not_found(&key, "location not found from API"))
            }
        }
    }

    /// Removes a cached resolution.
    ///
    /// Returns `Ok(true)` if a record existed for the normalized key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for inputs that cannot be normalized.
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    pub async fn delete(&self, raw: &str) -> Result<bool, AppError> {
        let key = normalize_location(raw)?;
        let existed = self.repository.delete(&key).await?;

        if existed {
            info!(location = %key, "Removed cached location");
        } else {
            debug!(location = %key, "Nothing cached to remove");
        }

        Ok(existed)
    }

    /// Returns true if the location store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.repository.health_check().await
    }

    /// Returns true if the geocoding provider has credentials.
    pub fn geocoder_configured(&self) -> bool {
        self.geocoder.is_configured()
    }

    /// Reads the cache, treating store failures as a miss.
    async fn lookup_cached(&self, key: &LocationKey) -> Option<LocationRecord> {
        match self.repository.get(key).await {
            Ok(record) => record,
            Err(e) => {
                error!(
                    location = %key,
                    error = %e,
                    "Location store read failed, falling back to geocoding API"
                );
                None
            }
        }
    }

    /// Writes a resolution to the cache, logging instead of failing.
    async fn store_best_effort(&self, record: &LocationRecord) {
        if let Err(e) = self.repository.put(record).await {
            error!(location = %record.location(), error = %e, "Failed to cache location");
        }
    }
}

fn not_found(key: &LocationKey, message: &str) -> AppError {
    AppError::not_found(message, json!({ "location": key.as_str() }))
}
