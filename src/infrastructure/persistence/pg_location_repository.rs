//! PostgreSQL implementation of the location repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{LocationRecord, LocationStatus, RecordError};
use crate::domain::repositories::{LocationRepository, StoreError};
use crate::utils::location_key::{LocationKey, normalize_location};

/// Raw row of the `locations` table.
#[derive(Debug, FromRow)]
struct LocationRow {
    location: String,
    full_address: String,
    latitude: f64,
    longitude: f64,
    status: String,
}

#[derive(Debug, FromRow)]
struct LocationListRow {
    location: String,
    full_address: String,
    latitude: f64,
    longitude: f64,
    status: String,
    updated_at: DateTime<Utc>,
}

/// A cached record together with its last write time, for administration.
#[derive(Debug, Clone)]
pub struct StoredLocation {
    pub record: LocationRecord,
    pub updated_at: DateTime<Utc>,
}

/// Number of cached records per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationCounts {
    pub found: i64,
    pub not_found: i64,
}

impl LocationCounts {
    pub fn total(&self) -> i64 {
        self.found + self.not_found
    }
}

fn into_record(
    location: String,
    full_address: String,
    latitude: f64,
    longitude: f64,
    status: String,
) -> Result<LocationRecord, StoreError> {
    let corrupt = |source: RecordError| StoreError::CorruptRecord {
        location: location.clone(),
        source,
    };

    let key = normalize_location(&location).map_err(|e| corrupt(e.into()))?;
    let status: LocationStatus = status.parse().map_err(corrupt)?;

    LocationRecord::from_parts(key, full_address, latitude, longitude, status).map_err(corrupt)
}

impl TryFrom<LocationRow> for LocationRecord {
    type Error = StoreError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        into_record(
            row.location,
            row.full_address,
            row.latitude,
            row.longitude,
            row.status,
        )
    }
}

/// PostgreSQL repository backing the geocoding cache.
///
/// All statements are parameterized; location strings are never interpolated
/// into SQL.
pub struct PgLocationRepository {
    pool: Arc<PgPool>,
}

impl PgLocationRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Lists cached records, most recently written first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on database errors or corrupt rows.
    pub async fn list(
        &self,
        status: Option<LocationStatus>,
        limit: i64,
    ) -> Result<Vec<StoredLocation>, StoreError> {
        let rows = sqlx::query_as::<_, LocationListRow>(
            r#"
            SELECT location, full_address, latitude, longitude, status, updated_at
            FROM locations
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY updated_at DESC, location ASC
            LIMIT $2
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter()
            .map(|r| {
                let updated_at = r.updated_at;
                into_record(r.location, r.full_address, r.latitude, r.longitude, r.status)
                    .map(|record| StoredLocation { record, updated_at })
            })
            .collect()
    }

    /// Counts cached records by status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on database errors.
    pub async fn count_by_status(&self) -> Result<LocationCounts, StoreError> {
        let (found, not_found) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'found'),
                COUNT(*) FILTER (WHERE status = 'not_found')
            FROM locations
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(LocationCounts { found, not_found })
    }

    /// Deletes every negative record so those keys are re-queried upstream.
    ///
    /// Returns the number of removed records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on database errors.
    pub async fn purge_not_found(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM locations WHERE status = 'not_found'")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl LocationRepository for PgLocationRepository {
    async fn get(&self, key: &LocationKey) -> Result<Option<LocationRecord>, StoreError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT location, full_address, latitude, longitude, status
            FROM locations
            WHERE location = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(LocationRecord::try_from).transpose()
    }

    async fn put(&self, record: &LocationRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO locations (location, full_address, latitude, longitude, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (location) DO UPDATE SET
                full_address = EXCLUDED.full_address,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                status = EXCLUDED.status,
                updated_at = NOW()
            "#,
        )
        .bind(record.location().as_str())
        .bind(record.full_address())
        .bind(record.latitude())
        .bind(record.longitude())
        .bind(record.status().as_str())
        .execute(self.pool.as_ref())
        .await?;

        debug!(location = %record.location(), status = %record.status(), "Stored location");
        Ok(())
    }

    async fn delete(&self, key: &LocationKey) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM locations WHERE location = $1")
            .bind(key.as_str())
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
