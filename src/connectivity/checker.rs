// src/connectivity/checker.rs
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::connectivity::error::ConnectivityError;

/// Normalized status of a service probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    /// Service is fully operational
    Healthy,
    /// Service is not operational
    Unhealthy,
    /// Service is operational but constrained (e.g. rate limited)
    Degraded,
    /// Service did not respond within the timeout
    Timeout,
    /// Service rejected the credentials
    AuthenticationFailed,
    /// Status could not be determined
    Unknown,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceStatus::Healthy => "HEALTHY",
            ServiceStatus::Unhealthy => "UNHEALTHY",
            ServiceStatus::Degraded => "DEGRADED",
            ServiceStatus::Timeout => "TIMEOUT",
            ServiceStatus::AuthenticationFailed => "AUTHENTICATION_FAILED",
            ServiceStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Outcome of a single health check. Constructed once per probe, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    pub status: ServiceStatus,
    pub message: String,
    pub response_time_ms: Option<f64>,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

impl HealthCheckResult {
    pub fn new(status: ServiceStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            response_time_ms: None,
            details: None,
        }
    }

    pub fn with_response_time(mut self, ms: f64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Contract implemented by every service-specific health checker.
///
/// A checker performs one minimal probe request and translates the outcome
/// into a `HealthCheckResult`, or fails with a typed `ConnectivityError`.
/// Checkers own their client per call, so callers may run them concurrently
/// without coordination.
#[async_trait]
pub trait ServiceHealthChecker: Send + Sync {
    /// Human-readable name of the service being probed.
    fn service_name(&self) -> &str;

    /// Perform the probe.
    async fn check_health(&self) -> Result<HealthCheckResult, ConnectivityError>;
}
