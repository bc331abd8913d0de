//! Telemetry initialization: metrics, tracing, and structured logging

pub mod metrics;
pub mod tracing_setup;

use crate::config::TelemetryConfig;
use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the telemetry stack for the hosting process.
///
/// Returns `Some(PrometheusHandle)` when metrics are enabled so the host can
/// expose a scrape endpoint. Fails if a global subscriber is already set.
pub fn init(config: &TelemetryConfig) -> Result<Option<PrometheusHandle>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "idgw_core=info".into());

    let prometheus_handle = if config.metrics_enabled {
        let handle = metrics::install_prometheus_recorder()?;
        metrics::describe_metrics();
        Some(handle)
    } else {
        None
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    // The OpenTelemetry layer's subscriber type must match the composed
    // subscriber, so each branch builds its own stack.
    if config.log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true);
        let otel_layer = tracing_setup::create_otel_layer(config);
        registry
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let otel_layer = tracing_setup::create_otel_layer(config);
        registry
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    Ok(prometheus_handle)
}
