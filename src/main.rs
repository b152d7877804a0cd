//! slirc-warden - Straylight channel warden.
//!
//! Usage: `slirc-warden [config.toml]`

use slirc_warden::config::{ConfigStore, ConfigWatcher};
use slirc_warden::dispatch::Dispatcher;
use slirc_warden::engine::Moderator;
use slirc_warden::transport;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let store = ConfigStore::open(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    let store = Arc::new(store);
    let config = store.current();

    info!(
        host = %config.host,
        port = config.port,
        nick = %config.nick,
        channels = config.channels.len(),
        "Starting slirc-warden"
    );

    let (dispatcher, _worker) = Dispatcher::spawn(Moderator::new(Arc::clone(&config)));

    let _reloads = dispatcher.follow(store.subscribe());

    let _watcher = if config.watch_config {
        Some(ConfigWatcher::start(Arc::clone(&store))?)
    } else {
        None
    };

    transport::run(store, dispatcher).await?;

    Ok(())
}
