// src/connectivity/probe.rs
//
// Shared outcome mapping for HTTP probes. Every checker funnels its response
// and transport errors through these so the status table stays uniform:
//
//   401        -> ConnectivityError::Authentication
//   429        -> DEGRADED result (never an error)
//   >= 500     -> ConnectivityError::ServiceUnavailable
//   other 4xx  -> UNHEALTHY result
//   timeout    -> ConnectivityError::Timeout
//   connect    -> ConnectivityError::Network
//   other      -> UNKNOWN result (absorbed)

use reqwest::StatusCode;
use std::time::Instant;

use crate::connectivity::checker::{HealthCheckResult, ServiceStatus};
use crate::connectivity::error::ConnectivityError;

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Classify a non-2xx status. Returns `Ok(None)` for success statuses, in
/// which case the caller goes on to parse the body.
pub(crate) fn evaluate_status(
    service: &str,
    status: StatusCode,
    body: &str,
    response_time_ms: f64,
) -> Result<Option<HealthCheckResult>, ConnectivityError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ConnectivityError::Authentication(format!(
            "{} authentication failed: invalid credentials (401)",
            service
        )));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Ok(Some(
            HealthCheckResult::new(
                ServiceStatus::Degraded,
                format!("{} is rate limited (429)", service),
            )
            .with_response_time(response_time_ms),
        ));
    }

    if status.is_server_error() {
        return Err(ConnectivityError::ServiceUnavailable(format!(
            "{} unavailable: {} {}",
            service,
            status.as_u16(),
            body.trim()
        )));
    }

    if status.is_client_error() {
        return Ok(Some(
            HealthCheckResult::new(
                ServiceStatus::Unhealthy,
                format!("{} error: {} {}", service, status.as_u16(), body.trim()),
            )
            .with_response_time(response_time_ms),
        ));
    }

    Ok(None)
}

/// Map a reqwest transport failure onto the error set. Unclassified errors
/// become an UNKNOWN result instead of propagating.
pub(crate) fn map_transport_error(
    service: &str,
    err: reqwest::Error,
    response_time_ms: f64,
) -> Result<HealthCheckResult, ConnectivityError> {
    if err.is_timeout() {
        return Err(ConnectivityError::Timeout(format!(
            "{} request timed out: {}",
            service, err
        )));
    }

    if err.is_connect() {
        return Err(ConnectivityError::Network(format!(
            "{} connection error: {}",
            service, err
        )));
    }

    if err.is_builder() || err.is_redirect() || err.is_request() {
        return Err(ConnectivityError::Network(format!(
            "{} request error: {}",
            service, err
        )));
    }

    Ok(HealthCheckResult::new(
        ServiceStatus::Unknown,
        format!("Unexpected error checking {}: {}", service, err),
    )
    .with_response_time(response_time_ms))
}
