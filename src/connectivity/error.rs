// src/connectivity/error.rs

/// Typed failures a health check can propagate to its caller.
///
/// Rate limiting and unclassified errors are deliberately absent: those are
/// absorbed into a `HealthCheckResult` (DEGRADED / UNKNOWN) so a probe never
/// crashes a monitoring loop.
#[derive(Debug, thiserror::Error)]
pub enum ConnectivityError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}
