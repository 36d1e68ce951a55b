//! Item service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http::server (axum + tower middleware) │
//!                           │        │                                 │
//!                           │        ▼                                 │
//!                           │   http::handlers ──▶ items::ItemStore    │
//!                           │        │              (MemoryStore)      │
//!     Client Response       │        ▼                                 │
//!     ◀─────────────────────┼── JSON body / http::error                │
//!                           │                                          │
//!                           │  config · observability · lifecycle      │
//!                           └──────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use item_service::config::{load_config, validate_config, ConfigError, ServiceConfig};
use item_service::lifecycle::startup;
use item_service::observability::init_logging;

#[derive(Parser)]
#[command(name = "item-service")]
#[command(about = "In-memory item store served over HTTP", long_about = None)]
struct Cli {
    /// Path to a TOML config file; watched for log level changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    let log = init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "item-service starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_concurrent_requests = config.listener.max_concurrent_requests,
        request_timeout_secs = config.timeouts.request_secs,
        metrics_enabled = config.observability.metrics_enabled,
        config_file = ?cli.config,
        "Configuration loaded"
    );

    startup::run(config, cli.config, log).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
