//! Location entity representing one cached geocoding resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::location_key::{LocationKey, LocationKeyError};

/// Outcome stored for a location key.
///
/// Only two states are ever persisted. A lookup that has not been resolved yet
/// is represented by the *absence* of a record, never by a third status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    Found,
    NotFound,
}

impl LocationStatus {
    /// Returns the persisted string form (`"found"` / `"not_found"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "found" => Ok(Self::Found),
            "not_found" => Ok(Self::NotFound),
            other => Err(RecordError::UnknownStatus(other.to_string())),
        }
    }
}

/// Violations of the [`LocationRecord`] invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("found record must have a non-empty address")]
    EmptyAddress,

    #[error("not-found record must have an empty address and zero coordinates")]
    NotFoundWithData,

    #[error("coordinates out of range: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("unknown location status '{0}'")]
    UnknownStatus(String),

    #[error("invalid location key: {0}")]
    InvalidKey(#[from] LocationKeyError),
}

/// A resolved (or definitively unresolvable) location.
///
/// # Invariants
///
/// - A [`LocationStatus::Found`] record has a non-empty `full_address` and
///   finite coordinates within WGS84 bounds.
/// - A [`LocationStatus::NotFound`] record has an empty `full_address` and
///   `0.0`/`0.0` coordinates.
///
/// Both are enforced by the constructors; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    location: LocationKey,
    full_address: String,
    latitude: f64,
    longitude: f64,
    status: LocationStatus,
}

impl LocationRecord {
    /// Creates a positive resolution.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::EmptyAddress`] for a blank address and
    /// [`RecordError::InvalidCoordinates`] for non-finite or out-of-range
    /// coordinates.
    pub fn found(
        location: LocationKey,
        full_address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, RecordError> {
        let full_address = full_address.into();

        if full_address.trim().is_empty() {
            return Err(RecordError::EmptyAddress);
        }

        if !(latitude.is_finite() && (-90.0..=90.0).contains(&latitude))
            || !(longitude.is_finite() && (-180.0..=180.0).contains(&longitude))
        {
            return Err(RecordError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            location,
            full_address,
            latitude,
            longitude,
            status: LocationStatus::Found,
        })
    }

    /// Creates a negative resolution with the empty-address, zero-coordinate sentinel.
    pub fn not_found(location: LocationKey) -> Self {
        Self {
            location,
            full_address: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            status: LocationStatus::NotFound,
        }
    }

    /// Rebuilds a record from stored columns, re-checking the invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] if the stored data is inconsistent with `status`.
    pub fn from_parts(
        location: LocationKey,
        full_address: String,
        latitude: f64,
        longitude: f64,
        status: LocationStatus,
    ) -> Result<Self, RecordError> {
        match status {
            LocationStatus::Found => Self::found(location, full_address, latitude, longitude),
            LocationStatus::NotFound => {
                if !full_address.is_empty() || latitude != 0.0 || longitude != 0.0 {
                    return Err(RecordError::NotFoundWithData);
                }
                Ok(Self::not_found(location))
            }
        }
    }

    pub fn location(&self) -> &LocationKey {
        &self.location
    }

    pub fn full_address(&self) -> &str {
        &self.full_address
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn status(&self) -> LocationStatus {
        self.status
    }

    /// Returns true if this record carries coordinates.
    pub fn is_found(&self) -> bool {
        self.status == LocationStatus::Found
    }
}
