mod common;

use geocode_cache::domain::entities::{LocationRecord, LocationStatus};
use geocode_cache::domain::repositories::{LocationRepository, StoreError};
use geocode_cache::infrastructure::persistence::PgLocationRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_put_then_get(pool: PgPool) {
    let repo = PgLocationRepository::new(Arc::new(pool));
    let record = common::oakland_record();

    repo.put(&record).await.unwrap();
    let fetched = repo.get(record.location()).await.unwrap();

    assert_eq!(fetched, Some(record));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_get_missing(pool: PgPool) {
    let repo = PgLocationRepository::new(Arc::new(pool));

    let fetched = repo.get(&common::key("nowhere")).await.unwrap();

    assert!(fetched.is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_not_found_round_trip(pool: PgPool) {
    let repo = PgLocationRepository::new(Arc::new(pool));
    let record = LocationRecord::not_found(common::key("atlantis"));

    repo.put(&record).await.unwrap();
    let fetched = repo.get(&common::key("atlantis")).await.unwrap().unwrap();

    assert_eq!(fetched.status(), LocationStatus::NotFound);
    assert_eq!(fetched.full_address(), "");
    assert_eq!(fetched.latitude(), 0.0);
    assert_eq!(fetched.longitude(), 0.0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_put_overwrites(pool: PgPool) {
    let repo = PgLocationRepository::new(Arc::new(pool.clone()));
    let key = common::key(common::OAKLAND_KEY);

    repo.put(&LocationRecord::not_found(key.clone())).await.unwrap();
    repo.put(&common::oakland_record()).await.unwrap();
    repo.put(&common::oakland_record()).await.unwrap();

    let fetched = repo.get(&key).await.unwrap();
    assert_eq!(fetched, Some(common::oakland_record()));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delete(pool: PgPool) {
    let repo = PgLocationRepository::new(Arc::new(pool));
    let record = common::oakland_record();
    repo.put(&record).await.unwrap();

    assert!(repo.delete(record.location()).await.unwrap());
    assert!(!repo.delete(record.location()).await.unwrap());
    assert!(repo.get(record.location()).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_corrupt_row_is_rejected(pool: PgPool) {
    sqlx::query(
        "INSERT INTO locations (location, full_address, latitude, longitude, status) VALUES ($1, '', 0, 0, 'found')",
    )
    .bind("berlin")
    .execute(&pool)
    .await
    .unwrap();

    let repo = PgLocationRepository::new(Arc::new(pool));
    let result = repo.get(&common::key("berlin")).await;

    assert!(matches!(result, Err(StoreError::CorruptRecord { .. })));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_and_count_by_status(pool: PgPool) {
    let repo = PgLocationRepository::new(Arc::new(pool));

    repo.put(&common::oakland_record()).await.unwrap();
    repo.put(&LocationRecord::not_found(common::key("atlantis")))
        .await
        .unwrap();
    repo.put(&LocationRecord::not_found(common::key("el dorado")))
        .await
        .unwrap();

    let counts = repo.count_by_status().await.unwrap();
    assert_eq!(counts.found, 1);
    assert_eq!(counts.not_found, 2);
    assert_eq!(counts.total(), 3);

    let all = repo.list(None, 10).await.unwrap();
    assert_eq!(all.len(), 3);

    let negatives = repo.list(Some(LocationStatus::NotFound), 10).await.unwrap();
    assert_eq!(negatives.len(), 2);
    assert!(negatives.iter().all(|s| !s.record.is_found()));

    let limited = repo.list(None, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_purge_not_found(pool: PgPool) {
    let repo = PgLocationRepository::new(Arc::new(pool));

    repo.put(&common::oakland_record()).await.unwrap();
    repo.put(&LocationRecord::not_found(common::key("atlantis")))
        .await
        .unwrap();

    assert_eq!(repo.purge_not_found().await.unwrap(), 1);

    let counts = repo.count_by_status().await.unwrap();
    assert_eq!(counts.found, 1);
    assert_eq!(counts.not_found, 0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_health_check(pool: PgPool) {
    let repo = PgLocationRepository::new(Arc::new(pool));

    assert!(repo.health_check().await);
}
