//! Automatic configuration reload on file change.
//!
//! Watches the directory containing the config file (editors commonly
//! replace files rather than write in place) and reloads the store when the
//! config file itself is created or modified. Events are debounced so a
//! reload only happens once the write has settled.

use super::ConfigStore;
use anyhow::{Context, Result};
use notify_debouncer_full::notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{DebounceEventResult, Debouncer, RecommendedCache, new_debouncer};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Keeps the filesystem watcher alive. Dropping it stops reloads.
pub struct ConfigWatcher {
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl ConfigWatcher {
    /// Start watching the store's config file. Must be called from within a
    /// Tokio runtime.
    pub fn start(store: Arc<ConfigStore>) -> Result<Self> {
        let path = store.path().to_path_buf();
        let file_name = path
            .file_name()
            .map(ToOwned::to_owned)
            .context("config path has no file name")?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };

        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(DEBOUNCE, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let changed = events.iter().any(|event| {
                        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
                            && event
                                .paths
                                .iter()
                                .any(|p| p.file_name() == Some(file_name.as_os_str()))
                    });
                    if changed {
                        let _ = tx.send(());
                    }
                }
                Err(errors) => {
                    for e in errors {
                        warn!(error = %e, "config watcher error");
                    }
                }
            }
        })
        .context("failed to create config file watcher")?;

        debouncer
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", dir.display()))?;
        info!(path = %path.display(), "Watching config...");

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                debug!("config file changed");
                // Failures are logged by the store; the old snapshot stays active.
                let store = Arc::clone(&store);
                if let Err(e) = tokio::task::spawn_blocking(move || store.reload()).await {
                    warn!(error = %e, "config reload task failed");
                }
            }
        });

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}
