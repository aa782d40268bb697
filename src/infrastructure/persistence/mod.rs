//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters for every statement.
//!
//! # Repositories
//!
//! - [`PgLocationRepository`] - Geocoding cache stored in the `locations` table

pub mod pg_location_repository;

pub use pg_location_repository::{LocationCounts, PgLocationRepository, StoredLocation};
