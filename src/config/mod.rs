// src/config/mod.rs
mod yaml;

pub use yaml::{find_yaml_config, load_yaml_config};

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::connectivity::{OpenRouterHealthChecker, TavilyHealthChecker};

pub const DEFAULT_OPENROUTER_MODEL: &str = "anthropic/claude-3-5-sonnet";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

/// API credential wrapper. Debug and Display output is redacted so a logged
/// Config can never leak key material.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Access the underlying secret. Call sites should pass the value
    /// straight into a request, never into a log statement.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required. Set it in your environment or .env file")]
    MissingCredential(&'static str),
}

/// Application configuration, loaded once at startup.
///
/// Settings merge with per-field precedence: environment variable > YAML
/// file value > built-in default. Credentials are accepted only from the
/// environment, never from YAML.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: ApiKey,
    pub tavily_api_key: ApiKey,
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub openrouter_timeout_secs: f64,
    pub tavily_base_url: String,
    pub tavily_timeout_secs: f64,
}

impl Config {
    /// Load configuration from the process environment plus an optional
    /// discovered YAML file. A `.env` file in the working directory (or an
    /// ancestor) is loaded first; existing variables are not overridden.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let env: HashMap<String, String> = std::env::vars().collect();

        let yaml = match find_yaml_config() {
            Some(path) => {
                debug!("Loading YAML configuration from {}", path.display());
                load_yaml_config(&path)
            }
            None => None,
        };

        Self::from_sources(&env, yaml.as_ref())
    }

    /// Build a Config from explicit sources. Split out from `from_env` so
    /// tests can exercise the merge without touching process state.
    pub(crate) fn from_sources(
        env: &HashMap<String, String>,
        yaml: Option<&serde_yaml::Value>,
    ) -> Result<Self, ConfigError> {
        let settings = yaml::merge_settings(yaml, env);

        let openrouter_api_key = require_credential(env, "OPENROUTER_API_KEY")?;
        let tavily_api_key = require_credential(env, "TAVILY_API_KEY")?;

        Ok(Self {
            openrouter_api_key: ApiKey::new(openrouter_api_key),
            tavily_api_key: ApiKey::new(tavily_api_key),
            openrouter_model: settings.openrouter_model,
            openrouter_base_url: settings.openrouter_base_url,
            openrouter_timeout_secs: settings.openrouter_timeout_secs,
            tavily_base_url: settings.tavily_base_url,
            tavily_timeout_secs: settings.tavily_timeout_secs,
        })
    }

    pub fn openrouter_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.openrouter_timeout_secs)
    }

    pub fn tavily_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.tavily_timeout_secs)
    }

    /// Build an OpenRouter checker from this configuration. A timeout of
    /// `None` uses the configured per-service timeout.
    pub fn openrouter_checker(&self, timeout: Option<Duration>) -> OpenRouterHealthChecker {
        OpenRouterHealthChecker::new(
            self.openrouter_api_key.expose(),
            self.openrouter_base_url.clone(),
            timeout.unwrap_or_else(|| self.openrouter_timeout()),
        )
    }

    /// Build a Tavily checker from this configuration.
    pub fn tavily_checker(&self, timeout: Option<Duration>) -> TavilyHealthChecker {
        TavilyHealthChecker::new(
            self.tavily_api_key.expose(),
            self.tavily_base_url.clone(),
            timeout.unwrap_or_else(|| self.tavily_timeout()),
        )
    }
}

fn require_credential(
    env: &HashMap<String, String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    match env.get(key) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(ConfigError::MissingCredential(key)),
    }
}

/// Convenience wrapper around `Config::from_env`.
pub fn get_config() -> Result<Config, ConfigError> {
    Config::from_env()
}
