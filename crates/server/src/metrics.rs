//! Prometheus metrics
//!
//! Counters and histograms are recorded through the `metrics` facade; the
//! exporter handle renders them for `GET /metrics`.

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::time::Instant;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder
///
/// Safe to call more than once; later calls return the first handle.
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_try_init(|| PrometheusBuilder::new().install_recorder())
        .map(Clone::clone)
        .map_err(|e| tracing::warn!("Failed to install Prometheus recorder: {}", e))
        .ok()
}

/// Record one handled request
pub fn record_request(method: &str, route: &str, status: u16, elapsed_secs: f64) {
    metrics::counter!(
        "kam_leads_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "kam_leads_http_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(elapsed_secs);
}

/// Record an engine or request error by kind
pub fn record_error(kind: &'static str) {
    metrics::counter!("kam_leads_engine_errors_total", "kind" => kind).increment(1);
}

/// Middleware timing every request against its route template
pub async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    record_request(
        &method,
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    match HANDLE.get() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}
