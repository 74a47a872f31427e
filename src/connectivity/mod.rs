// src/connectivity/mod.rs
mod checker;
mod duckduckgo;
mod error;
mod openrouter;
mod probe;
mod tavily;

pub use checker::{HealthCheckResult, ServiceHealthChecker, ServiceStatus};
pub use duckduckgo::DuckDuckGoHealthChecker;
pub use error::ConnectivityError;
pub use openrouter::OpenRouterHealthChecker;
pub use tavily::TavilyHealthChecker;
