//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fraud_headers_built_total` (counter): header builds by outcome (`ok` or error kind)
//! - `fraud_headers_build_duration_seconds` (histogram): time spent assembling headers
//! - `fraud_headers_device_ids_issued_total` (counter): new device ID cookies
//! - `fraud_headers_feedback_requests_total` (counter): diagnostic echo calls
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one header build.
pub fn record_build(outcome: &'static str, start: Instant) {
    counter!("fraud_headers_built_total", "outcome" => outcome).increment(1);
    histogram!("fraud_headers_build_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_device_id_issued() {
    counter!("fraud_headers_device_ids_issued_total").increment(1);
}

pub fn record_feedback_request() {
    counter!("fraud_headers_feedback_requests_total").increment(1);
}
