//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Create the item store
//! - Bind the listener and begin accepting traffic
//! - Apply log level changes from the config watcher
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};

use crate::config::{ConfigWatcher, ServiceConfig};
use crate::http::HttpServer;
use crate::items::{ItemStore, MemoryStore};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{metrics, LogHandle};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to watch config file: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Start every subsystem and serve until a stop signal arrives.
///
/// When `config_path` is set, the file is watched and log level changes
/// are applied without a restart.
pub async fn run(
    config: ServiceConfig,
    config_path: Option<PathBuf>,
    log: LogHandle,
) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let store: Arc<dyn ItemStore> = Arc::new(MemoryStore::new());
    metrics::record_store_size(store.len());

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    // Dropping the watcher stops it, so it lives until run returns.
    let _watcher = match config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(&path, &config);
            let watcher = watcher.run()?;
            tokio::spawn(apply_config_updates(updates, log, shutdown.subscribe()));
            Some(watcher)
        }
        None => None,
    };

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let server = HttpServer::new(config, store);
    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}

async fn apply_config_updates(
    mut updates: mpsc::UnboundedReceiver<ServiceConfig>,
    log: LogHandle,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(config) = update else { break };
                match log.apply_config_level(&config.observability.log_level) {
                    Ok(true) => tracing::info!("Config reloaded; settings other than log_level apply after restart"),
                    Ok(false) => {}
                    Err(e) => tracing::error!(error = %e, "Failed to apply reloaded log level"),
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::logging::reloadable_filter;
    use std::time::Duration;
    use tracing_subscriber::EnvFilter;

    fn with_level(level: &str) -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.observability.log_level = level.to_string();
        config
    }

    #[tokio::test]
    async fn test_updates_change_log_filter() {
        let (_layer, log) = reloadable_filter(EnvFilter::new("info"), false);
        let shutdown = Shutdown::new();
        let (tx, rx) = mpsc::unbounded_channel();

        tx.send(with_level("debug")).unwrap();
        tx.send(with_level("item_service=trace")).unwrap();
        drop(tx);

        apply_config_updates(rx, log.clone(), shutdown.subscribe()).await;
        assert_eq!(log.current().as_deref(), Some("item_service=trace"));
    }

    #[tokio::test]
    async fn test_updates_stop_on_shutdown() {
        let (_layer, log) = reloadable_filter(EnvFilter::new("info"), false);
        let shutdown = Shutdown::new();
        let (_tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(apply_config_updates(rx, log, shutdown.subscribe()));
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("update loop did not stop")
            .unwrap();
    }
}
