// src/connectivity/tavily.rs
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use crate::connectivity::checker::{HealthCheckResult, ServiceHealthChecker, ServiceStatus};
use crate::connectivity::error::ConnectivityError;
use crate::connectivity::probe::{elapsed_ms, evaluate_status, map_transport_error};

const SERVICE: &str = "Tavily API";

/// Health checker for the Tavily search API.
///
/// Probes `POST {base_url}/search` with a minimal one-result query. The
/// result details report whether the response carried an answer.
pub struct TavilyHealthChecker {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl TavilyHealthChecker {
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
impl ServiceHealthChecker for TavilyHealthChecker {
    fn service_name(&self) -> &str {
        "Tavily"
    }

    async fn check_health(&self) -> Result<HealthCheckResult, ConnectivityError> {
        let url = Url::parse(&format!("{}/search", self.base_url.trim_end_matches('/')))
            .map_err(|e| ConnectivityError::Network(format!("Invalid Tavily URL: {}", e)))?;

        let payload = json!({
            "api_key": self.api_key,
            "query": "test",
            "max_results": 1,
        });

        debug!("Probing {}", url);

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConnectivityError::Network(format!("Failed to build HTTP client: {}", e)))?;

        let start = Instant::now();

        let response = match client.post(url).json(&payload).send().await {
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
            warn!("Tavily probe degraded: {}", result.message);
            return Ok(result);
        }

        let data: Value = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(err) => {
                return Ok(HealthCheckResult::new(
                    ServiceStatus::Unhealthy,
                    format!("Failed to parse Tavily response: {}", err),
                )
                .with_response_time(response_time_ms));
            }
        };

        // Truthiness of the answer field: absent, null, empty, and zero all
        // count as no answer.
        let has_answer = match data.get("answer") {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        };

        Ok(
            HealthCheckResult::new(ServiceStatus::Healthy, "Tavily API is operational")
                .with_response_time(response_time_ms)
                .with_detail("has_answer", has_answer),
        )
    }
}
