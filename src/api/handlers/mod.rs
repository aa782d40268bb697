//! HTTP request handlers for API endpoints.

pub mod health;
pub mod location;

pub use health::health_handler;
pub use location::{delete_location_handler, get_location_handler};
