// src/connectivity/duckduckgo.rs
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use crate::connectivity::checker::{HealthCheckResult, ServiceHealthChecker, ServiceStatus};
use crate::connectivity::error::ConnectivityError;
use crate::connectivity::probe::{elapsed_ms, evaluate_status, map_transport_error};

const SERVICE: &str = "DuckDuckGo";

pub const DEFAULT_DUCKDUCKGO_BASE_URL: &str = "https://api.duckduckgo.com";

/// Health checker for DuckDuckGo search, via the Instant Answer API.
/// No credential is required.
pub struct DuckDuckGoHealthChecker {
    base_url: String,
    timeout: Duration,
}

impl DuckDuckGoHealthChecker {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl Default for DuckDuckGoHealthChecker {
    fn default() -> Self {
        Self::new(DEFAULT_DUCKDUCKGO_BASE_URL, Duration::from_secs(10))
    }
}

#[async_trait]
impl ServiceHealthChecker for DuckDuckGoHealthChecker {
    fn service_name(&self) -> &str {
        "DuckDuckGo"
    }

    async fn check_health(&self) -> Result<HealthCheckResult, ConnectivityError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConnectivityError::Network(format!("Invalid DuckDuckGo URL: {}", e)))?;

        debug!("Probing {}", url);

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConnectivityError::Network(format!("Failed to build HTTP client: {}", e)))?;

        let start = Instant::now();

        let request = client
            .get(url)
            .query(&[("q", "test"), ("format", "json"), ("no_html", "1")]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return map_transport_error(SERVICE, err, elapsed_ms(start)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return map_transport_error(SERVICE, err, elapsed_ms(start)),
        };
        let response_time_ms = elapsed_ms(start);

        if let Some(result) = evaluate_status(SERVICE, status, &body, response_time_ms)? {
            warn!("DuckDuckGo probe degraded: {}", result.message);
            return Ok(result);
        }

        // The Instant Answer API serves JSON with a javascript content type,
        // so the body is parsed by hand rather than via Response::json.
        let data: Value = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(err) => {
                return Ok(HealthCheckResult::new(
                    ServiceStatus::Unhealthy,
                    format!("Failed to parse DuckDuckGo response: {}", err),
                )
                .with_response_time(response_time_ms));
            }
        };

        let result_count = match data.get("RelatedTopics").and_then(Value::as_array) {
            Some(topics) => topics.len(),
            None => {
                return Ok(HealthCheckResult::new(
                    ServiceStatus::Unhealthy,
                    "Unexpected DuckDuckGo response format: missing related topics",
                )
                .with_response_time(response_time_ms));
            }
        };

        Ok(
            HealthCheckResult::new(ServiceStatus::Healthy, "DuckDuckGo search is operational")
                .with_response_time(response_time_ms)
                .with_detail("result_count", result_count),
        )
    }
}
