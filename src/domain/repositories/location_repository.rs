//! Repository trait for the geocoding cache.

use async_trait::async_trait;

use crate::domain::entities::{LocationRecord, RecordError};
use crate::utils::location_key::LocationKey;

/// Errors raised by a location store backend.
///
/// Every variant means the store could not answer; none of them means the key
/// is absent. Callers resolving locations treat them as a cache miss.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt record for '{location}': {source}")]
    CorruptRecord {
        location: String,
        #[source]
        source: RecordError,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent mapping from normalized location keys to resolution records.
///
/// Keys are [`LocationKey`] values, so nothing un-normalized can be written
/// or queried.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLocationRepository`] - PostgreSQL `locations` table
/// - [`crate::infrastructure::cache::RedisLocationStore`] - Redis, JSON values without expiry
/// - [`crate::infrastructure::cache::MemoryLocationStore`] - In-process map for development and tests
///
/// # Examples
///
/// See integration tests: `tests/repository_location.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Returns the stored record for `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if the key was resolved before (found or not found)
    /// - `Ok(None)` if the key has never been resolved
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be reached or returns a
    /// record that violates the entity invariants.
    async fn get(&self, key: &LocationKey) -> Result<Option<LocationRecord>, StoreError>;

    /// Upserts `record` at its key.
    ///
    /// Writing the same record twice leaves the same stored state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failures.
    async fn put(&self, record: &LocationRecord) -> Result<(), StoreError>;

    /// Removes the record for `key`.
    ///
    /// Returns `Ok(true)` if a record existed and was removed, `Ok(false)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failures.
    async fn delete(&self, key: &LocationKey) -> Result<bool, StoreError>;

    /// Checks if the backend is reachable.
    ///
    /// Used by the health endpoint.
    async fn health_check(&self) -> bool;
}
