//! Metrics collection and exposition.
//!
//! # Metrics
//! - `todo_api_requests_total` (counter): requests by method, status
//! - `todo_api_request_duration_seconds` (histogram): latency by method
//!
//! # Design Decisions
//! - Recorded by the access-log middleware, so only logged routes are counted
//! - Prometheus exporter is optional and owns its own listener

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, elapsed: Duration) {
    counter!(
        "todo_api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("todo_api_request_duration_seconds", "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_request("GET", 200, Duration::from_millis(3));
    }
}
