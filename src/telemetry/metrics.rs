//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

pub const DISPATCH_TOTAL: &str = "idgw_dispatch_total";
pub const DISPATCH_DURATION_SECONDS: &str = "idgw_dispatch_duration_seconds";
pub const UID_RESOLUTIONS_TOTAL: &str = "idgw_uid_resolutions_total";

/// Result of one dispatch, as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Backend answered with an OK status
    Ok,
    /// Backend answered with its own non-OK status
    BackendStatus,
    /// No client could be obtained; reported as an internal status
    ClientUnavailable,
    /// The call failed on the wire; raised to the caller
    TransportError,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Ok => "ok",
            DispatchOutcome::BackendStatus => "backend_status",
            DispatchOutcome::ClientUnavailable => "client_unavailable",
            DispatchOutcome::TransportError => "transport_error",
        }
    }
}

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    // Backend lookups are expected in the low-millisecond range.
    let buckets = [0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines from startup.
pub fn describe_metrics() {
    describe_counter!(
        DISPATCH_TOTAL,
        "User provider dispatches by operation and outcome"
    );
    describe_histogram!(
        DISPATCH_DURATION_SECONDS,
        "User provider dispatch duration in seconds"
    );
    describe_counter!(
        UID_RESOLUTIONS_TOTAL,
        "User id resolutions by result (canonical/resolved/failed)"
    );

    counter!(DISPATCH_TOTAL, "operation" => "GetUser", "outcome" => "ok").absolute(0);
    histogram!(DISPATCH_DURATION_SECONDS, "operation" => "GetUser").record(0.0);
    counter!(UID_RESOLUTIONS_TOTAL, "result" => "canonical").absolute(0);
}

pub fn record_dispatch(operation: &'static str, outcome: DispatchOutcome, elapsed: Duration) {
    counter!(DISPATCH_TOTAL, "operation" => operation, "outcome" => outcome.as_str()).increment(1);
    histogram!(DISPATCH_DURATION_SECONDS, "operation" => operation).record(elapsed.as_secs_f64());
}

pub fn record_uid_resolution(result: &'static str) {
    counter!(UID_RESOLUTIONS_TOTAL, "result" => result).increment(1);
}
