//! Request Logging Middleware

use tower_http::classify::{SharedClassifier, StatusInRangeAsFailures};
use tower_http::trace::TraceLayer;

/// Create the HTTP trace layer: one span per request, 5xx classified as
/// failures.
pub fn create_trace_layer() -> TraceLayer<SharedClassifier<StatusInRangeAsFailures>> {
    TraceLayer::new(StatusInRangeAsFailures::new(500..=599).into_make_classifier())
}
