//! Metrics collection and exposition.
//!
//! # Metrics
//! - `upstream_requests_total` (counter): upstream calls by endpoint, outcome
//! - `upstream_request_duration_seconds` (histogram): upstream latency
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::upstream::UpstreamResult;

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(
                "upstream_requests_total",
                "Upstream API calls by endpoint and outcome"
            );
            describe_histogram!(
                "upstream_request_duration_seconds",
                "Upstream API call latency in seconds"
            );
            tracing::info!(address = %addr, "Metrics endpoint listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
        }
    }
}

/// Record the outcome and latency of one upstream call.
pub fn record_upstream<T>(endpoint: &str, result: &UpstreamResult<T>, start: Instant) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind().as_str(),
    };

    counter!(
        "upstream_requests_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "upstream_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
