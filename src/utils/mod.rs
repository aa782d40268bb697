//! Utility functions shared across layers.
//!
//! - [`location_key`] - Location normalization into cache keys
//! - [`connection_string`] - Credential masking for log output

pub mod connection_string;
pub mod location_key;
