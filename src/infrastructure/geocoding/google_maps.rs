//! Google Maps Geocoding API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::domain::entities::LocationRecord;
use crate::domain::geocoder::{GeocodeError, GeocodeOutcome, Geocoder};
use crate::utils::location_key::LocationKey;

/// Default endpoint of the Google Maps Geocoding API.
pub const DEFAULT_GEOCODER_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Provider statuses that mean "the query was understood, nothing matched".
const NO_RESULT_STATUSES: &[&str] = &["OK", "ZERO_RESULTS"];

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Geocoder backed by the Google Maps Geocoding API.
///
/// Issues one `GET {base_url}?address=...&key=...` per lookup with a bounded
/// timeout. Query parameters are URL-encoded by the HTTP client.
pub struct GoogleGeocoder {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    http_client: Client,
}

impl GoogleGeocoder {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// - `api_key` - API credential; lookups without one are still sent and
    ///   the provider's rejection is reported as [`GeocodeError::Provider`]
    /// - `base_url` - Endpoint URL, [`DEFAULT_GEOCODER_URL`] in production
    /// - `timeout` - Upper bound for a whole request, including the body
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into(),
            timeout,
            http_client,
        })
    }

    /// Returns the configured endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends the lookup request and returns the HTTP status with the raw body.
    async fn fetch(&self, key: &LocationKey) -> Result<(u16, String), GeocodeError> {
        let mut query = vec![("address", key.as_str())];
        if let Some(api_key) = &self.api_key {
            query.push(("key", api_key.as_str()));
        }

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        Ok((status.as_u16(), body))
    }
}

/// Converts a reqwest error without leaking the request URL (it carries the API key).
fn map_transport_error(e: reqwest::Error) -> GeocodeError {
    if e.is_timeout() {
        GeocodeError::Timeout
    } else {
        GeocodeError::Transport(e.without_url().to_string())
    }
}

/// Parses a provider response body into a geocoding outcome.
///
/// # Rules
///
/// - Non-empty `results`: the first result becomes a found record
/// - Empty `results` with status `OK`, `ZERO_RESULTS` or no status: [`GeocodeOutcome::NoResults`]
/// - Empty `results` with any other status (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, ...):
///   [`GeocodeError::Provider`]
/// - Missing `results`, missing fields, or an unusable first result: [`GeocodeError::Parse`]
///
/// # Errors
///
/// See rules above.
pub fn parse_response(key: &LocationKey, body: &str) -> Result<GeocodeOutcome, GeocodeError> {
    let parsed: GeocodeResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse {
            reason: e.to_string(),
            body: body.to_string(),
        })?;

    let Some(first) = parsed.results.into_iter().next() else {
        return match parsed.status {
            Some(status) if !NO_RESULT_STATUSES.contains(&status.as_str()) => {
                Err(GeocodeError::Provider {
                    status,
                    message: parsed.error_message,
                })
            }
            _ => Ok(GeocodeOutcome::NoResults),
        };
    };

    let record = LocationRecord::found(
        key.clone(),
        first.formatted_address,
        first.geometry.location.lat,
        first.geometry.location.lng,
    )
    .map_err(|e| GeocodeError::Parse {
        reason: e.to_string(),
        body: body.to_string(),
    })?;

    Ok(GeocodeOutcome::Found(record))
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, key: &LocationKey) -> Result<GeocodeOutcome, GeocodeError> {
        debug!(location = %key, "Querying geocoding API");

        let (status, body) = self.fetch(key).await.inspect_err(|e| {
            error!(location = %key, error = %e, "Error fetching from geocoding API");
        })?;

        if !(200..300).contains(&status) {
            warn!(location = %key, status, body = %body, "Geocoding API returned an error status");
            return Err(GeocodeError::Status { status, body });
        }

        parse_response(key, &body).inspect_err(|e| match e {
            GeocodeError::Parse { reason, body } => error!(
                location = %key,
                reason = %reason,
                body = %body,
                "Error processing geocoding response, format changed?"
            ),
            other => warn!(location = %key, error = %other, "Geocoding API rejected the request"),
        })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
