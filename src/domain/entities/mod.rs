//! Core domain entities.
//!
//! - [`LocationRecord`] - A cached geocoding resolution, found or not found
//! - [`LocationStatus`] - The two persisted resolution states

pub mod location;

pub use location::{LocationRecord, LocationStatus, RecordError};
