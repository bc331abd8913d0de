//! Configuration management for the identity gateway

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address of the backend user provider (e.g., localhost:9144)
    pub user_provider_endpoint: String,
    /// Client pool configuration
    pub pool: PoolConfig,
    /// Logging, tracing and metrics configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub connect_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
        }
    }
}

impl PoolConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log output format: "text" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
    pub tracing_enabled: bool,
    /// OTLP collector endpoint, required when tracing is enabled
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            metrics_enabled: false,
            tracing_enabled: false,
            otlp_endpoint: None,
            service_name: "idgw-core".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| {
            lookup(key)
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false)
        };

        Ok(Self {
            user_provider_endpoint: lookup("USER_PROVIDER_ENDPOINT")
                .unwrap_or_else(|| "localhost:9144".to_string()),
            pool: PoolConfig {
                connect_timeout_secs: lookup("POOL_CONNECT_TIMEOUT_SECS")
                    .unwrap_or_else(|| "5".to_string())
                    .parse()
                    .context("Invalid POOL_CONNECT_TIMEOUT_SECS")?,
            },
            telemetry: TelemetryConfig {
                log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
                metrics_enabled: flag("METRICS_ENABLED"),
                tracing_enabled: flag("OTEL_TRACING_ENABLED"),
                otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT"),
                service_name: lookup("OTEL_SERVICE_NAME")
                    .unwrap_or_else(|| "idgw-core".to_string()),
            },
        })
    }
}
