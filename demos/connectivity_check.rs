// demos/connectivity_check.rs
//
// Checks connectivity to OpenRouter, Tavily, and DuckDuckGo and prints a
// per-service report. Requires OPENROUTER_API_KEY and TAVILY_API_KEY in the
// environment.
//
// Run with: cargo run --example connectivity_check

use anyhow::Result;
use stormer_connectivity::config::get_config;
use stormer_connectivity::connectivity::{DuckDuckGoHealthChecker, ServiceHealthChecker};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = get_config()?;

    let checkers: Vec<Box<dyn ServiceHealthChecker>> = vec![
        Box::new(config.openrouter_checker(None)),
        Box::new(config.tavily_checker(None)),
        Box::new(DuckDuckGoHealthChecker::default()),
    ];

    println!("Checking service connectivity...\n");

    let outcomes = futures::future::join_all(
        checkers.iter().map(|checker| checker.check_health()),
    )
    .await;

    for (checker, outcome) in checkers.iter().zip(outcomes) {
        println!("{}:", checker.service_name());
        match outcome {
            Ok(result) => {
                println!("  Status: {}", result.status);
                println!("  Message: {}", result.message);
                if let Some(ms) = result.response_time_ms {
                    println!("  Response time: {:.2}ms", ms);
                }
                if let Some(details) = &result.details {
                    println!("  Details: {:?}", details);
                }
            }
            Err(err) => println!("  Error: {}", err),
        }
        println!();
    }

    println!("Connectivity check complete");
    Ok(())
}
