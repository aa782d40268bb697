//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure`. Mock implementations are generated via `mockall`
//! for unit tests.
//!
//! # Available Repositories
//!
//! - [`LocationRepository`] - Geocoding cache reads, upserts and deletions

pub mod location_repository;

pub use location_repository::{LocationRepository, StoreError};

#[cfg(test)]
pub use location_repository::MockLocationRepository;
