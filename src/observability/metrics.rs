//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, method, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_upstream_errors_total` (counter): transport failures by route
//! - `diagnostics_entries` (gauge): entries held by the diagnostics log
//!
//! Updates are no-ops until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed proxied request.
pub fn record_request(route: &'static str, method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "route" => route,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream transport failure.
pub fn record_upstream_error(route: &'static str) {
    counter!("gateway_upstream_errors_total", "route" => route).increment(1);
}

pub fn record_diagnostics_size(len: usize) {
    gauge!("diagnostics_entries").set(len as f64);
}
