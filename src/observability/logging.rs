//! Structured logging.
//!
//! Installs a `tracing` subscriber whose filter can be swapped at runtime
//! when the configuration file changes. `RUST_LOG`, when set, takes
//! precedence over the configured level, at startup and on every reload.

use tracing_subscriber::{
    filter::ParseError,
    fmt,
    layer::SubscriberExt,
    reload,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Registry,
};

use crate::config::{LogFormat, ObservabilityConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),

    #[error("failed to reload log filter: {0}")]
    Reload(#[from] reload::Error),
}

/// Handle to the installed subscriber's filter.
#[derive(Clone)]
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    /// The filter came from `RUST_LOG`; config reloads leave it alone.
    pinned_by_env: bool,
}

impl LogHandle {
    /// Replace the active filter with `directives` (e.g. `"debug"` or
    /// `"item_service=trace,tower_http=info"`).
    pub fn set_level(&self, directives: &str) -> Result<(), LoggingError> {
        let filter = EnvFilter::try_new(directives)?;
        self.filter.reload(filter)?;
        tracing::info!(log_level = directives, "Log filter updated");
        Ok(())
    }

    /// Apply `observability.log_level` from a reloaded config.
    ///
    /// Returns `false` without touching the filter when `RUST_LOG` chose it.
    pub fn apply_config_level(&self, directives: &str) -> Result<bool, LoggingError> {
        if self.pinned_by_env {
            tracing::warn!(log_level = directives, "RUST_LOG is set, ignoring configured log level");
            return Ok(false);
        }
        self.set_level(directives)?;
        Ok(true)
    }

    /// The active filter directives, or `None` once the subscriber is gone.
    pub fn current(&self) -> Option<String> {
        self.filter.with_current(|filter| filter.to_string()).ok()
    }
}

/// Wrap `filter` in a reload layer and return the handle that controls it.
pub(crate) fn reloadable_filter(
    filter: EnvFilter,
    pinned_by_env: bool,
) -> (reload::Layer<EnvFilter, Registry>, LogHandle) {
    let (layer, handle) = reload::Layer::new(filter);
    (
        layer,
        LogHandle {
            filter: handle,
            pinned_by_env,
        },
    )
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &ObservabilityConfig) -> Result<LogHandle, LoggingError> {
    let (filter, log) = match EnvFilter::try_from_default_env() {
        Ok(filter) => reloadable_filter(filter, true),
        Err(_) => reloadable_filter(EnvFilter::try_new(&config.log_level)?, false),
    };

    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()?;

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_level_swaps_filter() {
        let (_layer, log) = reloadable_filter(EnvFilter::new("info"), false);
        assert_eq!(log.current().as_deref(), Some("info"));

        log.set_level("item_service=debug").unwrap();
        assert_eq!(log.current().as_deref(), Some("item_service=debug"));
    }

    #[test]
    fn test_invalid_directive_keeps_filter() {
        let (_layer, log) = reloadable_filter(EnvFilter::new("info"), false);
        let err = log.set_level("item_service=loud").unwrap_err();
        assert!(matches!(err, LoggingError::Filter(_)));
        assert_eq!(log.current().as_deref(), Some("info"));
    }

    #[test]
    fn test_env_filter_not_replaced_by_config() {
        let (_layer, log) = reloadable_filter(EnvFilter::new("warn"), true);
        assert!(!log.apply_config_level("debug").unwrap());
        assert_eq!(log.current().as_deref(), Some("warn"));

        let (_layer, log) = reloadable_filter(EnvFilter::new("warn"), false);
        assert!(log.apply_config_level("debug").unwrap());
        assert_eq!(log.current().as_deref(), Some("debug"));
    }

    #[test]
    fn test_reload_after_subscriber_dropped() {
        let (layer, log) = reloadable_filter(EnvFilter::new("info"), false);
        drop(layer);
        assert!(matches!(log.set_level("debug"), Err(LoggingError::Reload(_))));
        assert!(log.current().is_none());
    }
}
