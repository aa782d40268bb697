//! Geocoding provider clients.
//!
//! - [`GoogleGeocoder`] - Google Maps Geocoding API over HTTPS

pub mod google_maps;

pub use google_maps::{DEFAULT_GEOCODER_URL, GoogleGeocoder};
