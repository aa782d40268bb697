//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// - A span at `INFO` per request with method, URI and HTTP version
/// - Request start at `DEBUG`
/// - Response status and latency in milliseconds at `INFO`
/// - 5xx responses additionally at `ERROR`
///
/// ```text
/// INFO request{method=GET uri=/location/berlin version=HTTP/1.1}: finished processing request latency=84 ms status=200
/// ```
///
/// 404 responses for unresolvable locations are ordinary outcomes and are not
/// logged as failures.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
