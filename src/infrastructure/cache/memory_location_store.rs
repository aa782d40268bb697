//! In-process location store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use crate::domain::entities::LocationRecord;
use crate::domain::repositories::{LocationRepository, StoreError};
use crate::utils::location_key::LocationKey;

/// A location store held in process memory.
///
/// Contents are lost on restart. Used for local development
/// (`CACHE_BACKEND=memory`) and in tests.
#[derive(Default)]
pub struct MemoryLocationStore {
    records: RwLock<HashMap<LocationKey, LocationRecord>>,
}

impl MemoryLocationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory location store");
        Self::default()
    }

    /// Returns the number of cached records.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

#[async_trait]
impl LocationRepository for MemoryLocationStore {
    async fn get(&self, key: &LocationKey) -> Result<Option<LocationRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(key).cloned())
    }

    async fn put(&self, record: &LocationRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.insert(record.location().clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, key: &LocationKey) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        Ok(records.remove(key).is_some())
    }

    async fn health_check(&self) -> bool {
        !self.records.is_poisoned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::location_key::normalize_location;

    fn oakland() -> LocationRecord {
        LocationRecord::found(
            normalize_location("7th West, Oakland, CA").unwrap(),
            "7th West, Oakland, CA 94607, USA",
            37.77493,
            -122.251686,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get_returns_equal_record() {
        let store = MemoryLocationStore::new();
        let record = oakland();

        store.put(&record).await.unwrap();
        let loaded = store.get(record.location()).await.unwrap();

        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryLocationStore::new();
        let key = normalize_location("nowhere").unwrap();

        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_is_upsert() {
        let store = MemoryLocationStore::new();
        let key = normalize_location("7th west, oakland, ca").unwrap();

        store.put(&LocationRecord::not_found(key.clone())).await.unwrap();
        store.put(&oakland()).await.unwrap();
        store.put(&oakland()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get(&key).await.unwrap().unwrap().is_found());
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let store = MemoryLocationStore::new();
        let record = oakland();
        store.put(&record).await.unwrap();

        assert!(store.delete(record.location()).await.unwrap());
        assert_eq!(store.get(record.location()).await.unwrap(), None);
        assert!(!store.delete(record.location()).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        assert!(MemoryLocationStore::new().health_check().await);
    }

    #[tokio::test]
    async fn test_poisoned_lock_keeps_len() {
        let store = MemoryLocationStore::new();
        store.put(&oakland()).await.unwrap();

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.records.write().unwrap();
            panic!("poison the lock");
        }));

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert!(!store.health_check().await);
        assert!(matches!(
            store.get(oakland().location()).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
