//! CodeJudge - Worker Entry Point
//!
//! Reads one JSON `ExecutionRequest` from stdin, executes it and writes the
//! JSON `ExecutionResult` to stdout. Logs go to stderr.

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codejudge::{Dispatcher, EngineConfig, ExecutionRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = EngineConfig::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!(mode = %config.mode, "Starting CodeJudge worker");

    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("Failed to read request from stdin")?;
    let request: ExecutionRequest =
        serde_json::from_str(&raw).context("Invalid execution request")?;

    let dispatcher = Dispatcher::new(config);
    let result = dispatcher.execute_request(&request).await;

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
