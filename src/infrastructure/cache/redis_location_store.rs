//! Redis-backed location store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::entities::{LocationRecord, LocationStatus};
use crate::domain::repositories::{LocationRepository, StoreError};
use crate::utils::location_key::{LocationKey, normalize_location};

/// JSON value stored under each Redis key.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    location: String,
    full_address: String,
    latitude: f64,
    longitude: f64,
    status: LocationStatus,
}

impl From<&LocationRecord> for StoredRecord {
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

impl TryFrom<StoredRecord> for LocationRecord {
    type Error = StoreError;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        let location = stored.location;
        let key = normalize_location(&location).map_err(|e| StoreError::CorruptRecord {
            location: location.clone(),
            source: e.into(),
        })?;

        LocationRecord::from_parts(
            key,
            stored.full_address,
            stored.latitude,
            stored.longitude,
            stored.status,
        )
        .map_err(|source| StoreError::CorruptRecord { location, source })
    }
}

/// Location store keeping each record as a JSON string in Redis.
///
/// Entries are written without expiry: a cached resolution, positive or
/// negative, lives until it is deleted.
pub struct RedisLocationStore {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisLocationStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "location:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &LocationKey) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl LocationRepository for RedisLocationStore {
    async fn get(&self, key: &LocationKey) -> Result<Option<LocationRecord>, StoreError> {
        let mut conn = self.client.clone();

        let Some(raw) = conn.get::<_, Option<String>>(self.build_key(key)).await? else {
            return Ok(None);
        };

        let stored: StoredRecord = serde_json::from_str(&raw)?;
        LocationRecord::try_from(stored).map(Some)
    }

    async fn put(&self, record: &LocationRecord) -> Result<(), StoreError> {
        let mut conn = self.client.clone();
        let value = serde_json::to_string(&StoredRecord::from(record))?;

        conn.set::<_, _, ()>(self.build_key(record.location()), value)
            .await?;

        debug!(location = %record.location(), status = %record.status(), "Stored location");
        Ok(())
    }

    async fn delete(&self, key: &LocationKey) -> Result<bool, StoreError> {
        let mut conn = self.client.clone();
        let deleted: i64 = conn.del(self.build_key(key)).await?;

        Ok(deleted > 0)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_record_json_shape() {
        let key = normalize_location("Berlin").unwrap();
        let record = LocationRecord::found(key, "Berlin, Germany", 52.52, 13.405).unwrap();

        let json = serde_json::to_value(StoredRecord::from(&record)).unwrap();

        assert_eq!(json["location"], "berlin");
        assert_eq!(json["full_address"], "Berlin, Germany");
        assert_eq!(json["status"], "found");
    }

    #[test]
    fn test_stored_record_restores_not_found() {
        let raw = r#"{"location":"atlantis","full_address":"","latitude":0.0,"longitude":0.0,"status":"not_found"}"#;
        let stored: StoredRecord = serde_json::from_str(raw).unwrap();

        let record = LocationRecord::try_from(stored).unwrap();

        assert_eq!(record.location().as_str(), "atlantis");
        assert!(!record.is_found());
    }

    #[test]
    fn test_stored_record_rejects_inconsistent_value() {
        let raw = r#"{"location":"atlantis","full_address":"","latitude":1.0,"longitude":2.0,"status":"found"}"#;
        let stored: StoredRecord = serde_json::from_str(raw).unwrap();

        let result = LocationRecord::try_from(stored);

        assert!(matches!(result, Err(StoreError::CorruptRecord { .. })));
    }
}
