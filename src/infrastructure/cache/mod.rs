//! Key-value location store backends.
//!
//! Alternatives to [`crate::infrastructure::persistence::PgLocationRepository`],
//! selected with `CACHE_BACKEND`:
//! - [`RedisLocationStore`] - Redis-backed store without expiry
//! - [`MemoryLocationStore`] - In-process store for development and tests

mod memory_location_store;
mod redis_location_store;

pub use memory_location_store::MemoryLocationStore;
pub use redis_location_store::RedisLocationStore;
