//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relays by selected worker
//! - `relay_body_degraded_total` (counter): bodies sent as `null`
//! - `relay_upstream_errors_total` (counter): failed sends to a worker
//! - `relay_request_duration_seconds` (histogram): end-to-end latency by status

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_relay(worker: &str) {
    counter!("relay_requests_total", "worker" => worker.to_string()).increment(1);
}

pub fn record_degraded_body() {
    counter!("relay_body_degraded_total").increment(1);
}

pub fn record_upstream_error(worker: &str) {
    counter!("relay_upstream_errors_total", "worker" => worker.to_string()).increment(1);
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    histogram!(
        "relay_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
