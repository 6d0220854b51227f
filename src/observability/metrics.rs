//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): dispatched requests by resource, status
//! - `dispatch_duration_seconds` (histogram): dispatch latency by resource
//! - `dispatch_errors_total` (counter): failed dispatches by error kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::error::ErrorKind;

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// One finished dispatch.
pub fn record_dispatch(resource: &str, status: u16, start: Instant) {
    let resource = resource.to_string();
    ::metrics::counter!(
        "dispatch_requests_total",
        "resource" => resource.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("dispatch_duration_seconds", "resource" => resource)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_error(kind: ErrorKind) {
    ::metrics::counter!("dispatch_errors_total", "kind" => kind.as_str()).increment(1);
}
