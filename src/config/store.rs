//! Current configuration snapshot with all-or-nothing reload.

use super::{Config, ConfigError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Owns the config file path and publishes the active snapshot.
///
/// Snapshots are immutable; a reload builds a complete new [`Config`] and
/// swaps it in only if loading and validation both succeed.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    tx: watch::Sender<Arc<Config>>,
}

impl ConfigStore {
    /// Load the initial configuration. Failure here is fatal to the caller.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = Config::load(&path)?;
        let (tx, _rx) = watch::channel(Arc::new(config));
        Ok(Self { path, tx })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The active snapshot.
    pub fn current(&self) -> Arc<Config> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every successful reload.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Config>> {
        self.tx.subscribe()
    }

    /// Re-read the config file.
    ///
    /// On error the active snapshot is left untouched.
    pub fn reload(&self) -> Result<Arc<Config>, ConfigError> {
        match Config::load(&self.path) {
            Ok(config) => {
                let config = Arc::new(config);
                self.tx.send_replace(Arc::clone(&config));
                info!(path = %self.path.display(), channels = config.channels.len(), "Config reloaded");
                Ok(config)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Config reload failed, keeping previous config");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r##"
host = "irc.example.net"
nick = "warden"

[channels."#rust"]
voiced = ["bob"]
"##;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn rewrite(file: &NamedTempFile, contents: &str) {
        std::fs::write(file.path(), contents).unwrap();
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let result = ConfigStore::open("/nonexistent/warden.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_reload_replaces_snapshot() {
        let file = write_config(VALID);
        let store = ConfigStore::open(file.path()).unwrap();
        let rx = store.subscribe();

        rewrite(
            &file,
            r##"
host = "irc.example.net"
nick = "warden"

[channels."#rust"]
voiced = ["bob", "carol"]

[channels."#offtopic"]
"##,
        );
        store.reload().unwrap();

        let current = store.current();
        assert_eq!(current.channels.len(), 2);
        assert!(current.channel("#rust").unwrap().voiced.contains("carol"));
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let file = write_config(VALID);
        let store = ConfigStore::open(file.path()).unwrap();
        let before = store.current();
        let rx = store.subscribe();

        rewrite(&file, "host = [unterminated");
        assert!(matches!(store.reload(), Err(ConfigError::Parse(_))));

        assert!(Arc::ptr_eq(&before, &store.current()));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_invalid_pattern_rejects_whole_reload() {
        let file = write_config(VALID);
        let store = ConfigStore::open(file.path()).unwrap();

        rewrite(
            &file,
            r##"
host = "irc.example.net"
nick = "warden"

[channels."#rust"]
voiced = []

[channels."#rust".kickPatterns]
"*" = ["(bad"]
"##,
        );
        assert!(store.reload().is_err());
        assert!(store.current().channel("#rust").unwrap().voiced.contains("bob"));
    }
}
