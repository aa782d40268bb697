//! Upstream geocoding provider port.

use async_trait::async_trait;

use crate::domain::entities::LocationRecord;
use crate::utils::location_key::LocationKey;

/// Result of a successful call to the geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    /// The provider returned at least one result; the first one is kept.
    Found(LocationRecord),
    /// The provider answered correctly with an empty result list.
    NoResults,
}

/// Failures talking to the geocoding provider.
///
/// None of these is a statement about the location itself, so none of them
/// may be cached as a negative result.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Transport(String),

    #[error("geocoding request timed out")]
    Timeout,

    #[error("geocoding provider returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("geocoding provider rejected the request: {status}")]
    Provider {
        status: String,
        message: Option<String>,
    },

    #[error("unexpected geocoding response: {reason}")]
    Parse { reason: String, body: String },
}

/// Resolves a normalized location against an external geocoding service.
///
/// # Implementations
///
/// - [`crate::infrastructure::geocoding::GoogleGeocoder`] - Google Maps Geocoding API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Performs a single lookup for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] on transport failures, non-success responses,
    /// or bodies that do not match the expected shape.
    async fn geocode(&self, key: &LocationKey) -> Result<GeocodeOutcome, GeocodeError>;

    /// Returns true if the provider has credentials configured.
    fn is_configured(&self) -> bool;
}
