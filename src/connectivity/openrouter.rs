// src/connectivity/openrouter.rs
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use crate::connectivity::checker::{HealthCheckResult, ServiceHealthChecker, ServiceStatus};
use crate::connectivity::error::ConnectivityError;
use crate::connectivity::probe::{elapsed_ms, evaluate_status, map_transport_error};

const SERVICE: &str = "OpenRouter API";

/// Health checker for the OpenRouter LLM gateway.
///
/// Probes `GET {base_url}/models` with bearer authentication; the model list
/// length is reported in the result details.
pub struct OpenRouterHealthChecker {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenRouterHealthChecker {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ServiceHealthChecker for OpenRouterHealthChecker {
    fn service_name(&self) -> &str {
        "OpenRouter"
    }

    async fn check_health(&self) -> Result<HealthCheckResult, ConnectivityError> {
        let url = Url::parse(&format!("{}/models", self.base_url.trim_end_matches('/')))
            .map_err(|e| ConnectivityError::Network(format!("Invalid OpenRouter URL: {}", e)))?;

        debug!("Probing {}", url);

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConnectivityError::Network(format!("Failed to build HTTP client: {}", e)))?;

        let start = Instant::now();

        let response = match client.get(url).bearer_auth(&self.api_key).send().await {
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
            warn!("OpenRouter probe degraded: {}", result.message);
            return Ok(result);
        }

        let data: Value = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(err) => {
                return Ok(HealthCheckResult::new(
                    ServiceStatus::Unhealthy,
                    format!("Failed to parse OpenRouter response: {}", err),
                )
                .with_response_time(response_time_ms));
            }
        };

        let models = match data.get("data").and_then(Value::as_array) {
            Some(models) => models,
            None => {
                return Ok(HealthCheckResult::new(
                    ServiceStatus::Unhealthy,
                    "Unexpected OpenRouter response format: missing model list",
                )
                .with_response_time(response_time_ms));
            }
        };

        Ok(
            HealthCheckResult::new(ServiceStatus::Healthy, "OpenRouter API is operational")
                .with_response_time(response_time_ms)
                .with_detail("model_count", models.len()),
        )
    }
}
