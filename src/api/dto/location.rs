//! DTOs for location endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{LocationRecord, LocationStatus};

/// Response body of `GET /location/{location}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResponse {
    /// Normalized location the record is cached under.
    pub location: String,
    pub full_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: LocationStatus,
}

impl From<&LocationRecord> for LocationResponse {
    fn from(record: &LocationRecord) -> Self {
        Self {
            location: record.location().to_string(),
            full_address: record.full_address().to_string(),
            latitude: record.latitude(),
            longitude: record.longitude(),
            status: record.status(),
        }
    }
}
