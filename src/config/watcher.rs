//! Config file watcher for log level hot reload.
//!
//! The parent directory is watched rather than the file itself, so saves
//! that replace the file (write to temp, rename) are still seen. A single
//! save usually produces several events; a config is only forwarded when
//! its `log_level` differs from the last one forwarded.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ServiceConfig;

/// Watches one config file and forwards log level changes.
pub struct ConfigWatcher {
    tracker: LogLevelTracker,
    update_tx: mpsc::UnboundedSender<ServiceConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, with `current` as the running config.
    ///
    /// Returns the watcher and a receiver for validated configs whose
    /// log level changed.
    pub fn new(
        path: &Path,
        current: &ServiceConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ServiceConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let tracker = LogLevelTracker::new(path, &current.observability.log_level);
        (Self { tracker, update_tx }, update_rx)
    }

    /// Start watching on notify's background thread.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            mut tracker,
            update_tx,
        } = self;
        let dir = tracker.watch_dir();
        let path = tracker.path.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Some(config) = tracker.on_event(res) {
                let _ = update_tx.send(config);
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

/// Turns raw file events into at most one config per log level change.
struct LogLevelTracker {
    path: PathBuf,
    file_name: Option<OsString>,
    applied_level: String,
}

impl LogLevelTracker {
    fn new(path: &Path, applied_level: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            file_name: path.file_name().map(|name| name.to_os_string()),
            applied_level: applied_level.to_string(),
        }
    }

    fn watch_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn on_event(&mut self, res: notify::Result<Event>) -> Option<ServiceConfig> {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(error = ?e, "Watch error");
                return None;
            }
        };
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return None;
        }
        let touches_config = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n.to_os_string()) == self.file_name);
        if !touches_config {
            return None;
        }

        match load_config(&self.path) {
            Ok(config) if config.observability.log_level == self.applied_level => {
                tracing::trace!(path = ?self.path, "Config event without log level change");
                None
            }
            Ok(config) => {
                tracing::info!(
                    from = %self.applied_level,
                    to = %config.observability.log_level,
                    "Config log level changed"
                );
                self.applied_level = config.observability.log_level.clone();
                Some(config)
            }
            Err(e) => {
                // Editors may fire events mid-write; the next event retries.
                tracing::warn!(error = %e, "Ignoring config change, keeping current configuration");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{DataChange, EventKind, ModifyKind, RemoveKind};
    use std::fs;
    use std::time::Duration;

    fn config_with_level(level: &str) -> String {
        format!("[observability]\nlog_level = \"{level}\"\n")
    }

    fn modified(path: &Path) -> notify::Result<Event> {
        Ok(Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(path.to_path_buf()))
    }

    #[test]
    fn test_forwards_only_level_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item-service.toml");
        fs::write(&path, config_with_level("info")).unwrap();
        let mut tracker = LogLevelTracker::new(&path, "info");

        assert!(tracker.on_event(modified(&path)).is_none());

        fs::write(&path, config_with_level("debug")).unwrap();
        let config = tracker.on_event(modified(&path)).unwrap();
        assert_eq!(config.observability.log_level, "debug");

        // Repeated events for the same save.
        assert!(tracker.on_event(modified(&path)).is_none());
        assert!(tracker.on_event(modified(&path)).is_none());
    }

    #[test]
    fn test_ignores_unrelated_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item-service.toml");
        fs::write(&path, config_with_level("debug")).unwrap();
        let mut tracker = LogLevelTracker::new(&path, "info");

        let other = dir.path().join("other.toml");
        assert!(tracker.on_event(modified(&other)).is_none());

        let removed = Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone());
        assert!(tracker.on_event(Ok(removed)).is_none());

        assert!(tracker.on_event(Err(notify::Error::generic("boom"))).is_none());
        assert_eq!(tracker.applied_level, "info");
    }

    #[test]
    fn test_invalid_config_keeps_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item-service.toml");
        fs::write(&path, config_with_level("item_service=loud")).unwrap();
        let mut tracker = LogLevelTracker::new(&path, "info");

        assert!(tracker.on_event(modified(&path)).is_none());
        assert_eq!(tracker.applied_level, "info");

        fs::write(&path, config_with_level("warn")).unwrap();
        assert!(tracker.on_event(modified(&path)).is_some());
    }

    #[test]
    fn test_watch_dir_for_bare_file_name() {
        let tracker = LogLevelTracker::new(Path::new("item-service.toml"), "info");
        assert_eq!(tracker.watch_dir(), PathBuf::from("."));
    }

    #[tokio::test]
    async fn test_watcher_sends_new_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item-service.toml");
        fs::write(&path, config_with_level("info")).unwrap();
        let current = load_config(&path).unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path, &current);
        let _watcher = watcher.run().unwrap();

        fs::write(&path, config_with_level("debug")).unwrap();
        let config = tokio::time::timeout(Duration::from_secs(5), updates.recv())
            .await
            .expect("no config update within timeout")
            .expect("watcher channel closed");
        assert_eq!(config.observability.log_level, "debug");
    }

    #[tokio::test]
    async fn test_watcher_skips_invalid_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item-service.toml");
        fs::write(&path, config_with_level("info")).unwrap();
        let current = load_config(&path).unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path, &current);
        let _watcher = watcher.run().unwrap();

        fs::write(&path, "[timeouts]\nrequest_secs = 0\n[observability]\nlog_level = \"debug\"\n").unwrap();
        let received = tokio::time::timeout(Duration::from_millis(1500), updates.recv()).await;
        assert!(received.is_err(), "invalid config must not be forwarded");
    }
}
