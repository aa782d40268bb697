//! Domain layer containing business entities and ports.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures ([`entities::LocationRecord`])
//! - [`repositories`] - Cache store trait definitions
//! - [`geocoder`] - Upstream geocoding provider trait
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on the HTTP or presentation layers
//! - Traits define contracts implemented by the infrastructure layer
//! - Resolution logic lives in [`crate::application::services`]

pub mod entities;
pub mod geocoder;
pub mod repositories;
