//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Redis and in-memory location stores
//! - [`geocoding`] - Upstream geocoding API clients
//! - [`persistence`] - PostgreSQL location store

pub mod cache;
pub mod geocoding;
pub mod persistence;
