mod common;

use geocode_cache::domain::entities::{LocationRecord, LocationStatus};
use geocode_cache::domain::repositories::LocationRepository;
use geocode_cache::infrastructure::cache::RedisLocationStore;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

fn redis_url() -> String {
    std::env::var("REDIS_URL").expect("REDIS_URL must be set")
}

async fn create_store() -> RedisLocationStore {
    RedisLocationStore::connect(&redis_url()).await.unwrap()
}

async fn raw_connection() -> ConnectionManager {
    ConnectionManager::new(Client::open(redis_url()).unwrap())
        .await
        .unwrap()
}

/// Removes leftovers from earlier runs so each test starts from a missing key.
async fn clean(store: &RedisLocationStore, location: &str) {
    store.delete(&common::key(location)).await.unwrap();
}

#[tokio::test]
#[ignore = "requires REDIS_URL"]
async fn test_put_then_get() {
    let store = create_store().await;
    let record = LocationRecord::found(
        common::key("redis round trip, oakland"),
        common::OAKLAND_ADDRESS,
        common::OAKLAND_LAT,
        common::OAKLAND_LNG,
    )
    .unwrap();
    clean(&store, "redis round trip, oakland").await;

    store.put(&record).await.unwrap();
    let fetched = store.get(record.location()).await.unwrap();

    assert_eq!(fetched, Some(record));
}

#[tokio::test]
#[ignore = "requires REDIS_URL"]
async fn test_get_missing() {
    let store = create_store().await;
    clean(&store, "redis nowhere").await;

    let fetched = store.get(&common::key("redis nowhere")).await.unwrap();

    assert!(fetched.is_none());
}

#[tokio::test]
#[ignore = "requires REDIS_URL"]
async fn test_not_found_round_trip() {
    let store = create_store().await;
    let key = common::key("redis atlantis");
    clean(&store, "redis atlantis").await;

    store.put(&LocationRecord::not_found(key.clone())).await.unwrap();
    let fetched = store.get(&key).await.unwrap().unwrap();

    assert_eq!(fetched.status(), LocationStatus::NotFound);
    assert_eq!(fetched.full_address(), "");
    assert_eq!(fetched.latitude(), 0.0);
    assert_eq!(fetched.longitude(), 0.0);
}

#[tokio::test]
#[ignore = "requires REDIS_URL"]
async fn test_put_overwrites_without_expiry() {
    let store = create_store().await;
    let key = common::key("redis overwrite, oakland");
    clean(&store, "redis overwrite, oakland").await;
    let found = LocationRecord::found(
        key.clone(),
        common::OAKLAND_ADDRESS,
        common::OAKLAND_LAT,
        common::OAKLAND_LNG,
    )
    .unwrap();

    store.put(&LocationRecord::not_found(key.clone())).await.unwrap();
    store.put(&found).await.unwrap();
    store.put(&found).await.unwrap();

    assert_eq!(store.get(&key).await.unwrap(), Some(found));

    let mut conn = raw_connection().await;
    let ttl: i64 = conn.ttl(format!("location:{}", key)).await.unwrap();
    assert_eq!(ttl, -1);
}

#[tokio::test]
#[ignore = "requires REDIS_URL"]
async fn test_delete() {
    let store = create_store().await;
    let record = LocationRecord::not_found(common::key("redis delete me"));
    store.put(&record).await.unwrap();

    assert!(store.delete(record.location()).await.unwrap());
    assert!(!store.delete(record.location()).await.unwrap());
    assert!(store.get(record.location()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires REDIS_URL"]
async fn test_health_check() {
    let store = create_store().await;

    assert!(store.health_check().await);
}
