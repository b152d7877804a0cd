//! Core configuration types and loading.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_max_reconnects, default_port, default_reconnect_jitter_ms,
    default_reconnect_wait_ms, default_true,
};
use super::policy::ChannelPolicy;
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// IRC server hostname.
    pub host: String,
    /// IRC server port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect over TLS.
    #[serde(default)]
    pub tls: bool,
    /// Nickname to register with.
    pub nick: String,
    /// Username (ident). Defaults to the nickname when unset.
    pub username: Option<String>,
    /// Server password (PASS).
    pub password: Option<String>,
    /// Reload the config file when it changes on disk (default: true).
    #[serde(default = "default_true")]
    pub watch_config: bool,
    /// Reconnect policy applied when the connection drops.
    #[serde(flatten)]
    pub reconnect: ReconnectConfig,
    /// Per-channel moderation policies, keyed by channel name.
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelPolicy>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Look up the policy for a channel.
    pub fn channel(&self, name: &str) -> Option<&ChannelPolicy> {
        self.channels.get(name)
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(content)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Reconnect behaviour after the connection to the server is lost.
///
/// Each attempt waits `wait_ms` plus a random `0..=jitter_ms`. The attempt
/// counter resets once a connection completes registration; after
/// `max_reconnects` consecutive failures the bot gives up.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconnectConfig {
    #[serde(rename = "reconnectWaitMs", default = "default_reconnect_wait_ms")]
    pub wait_ms: u64,
    #[serde(rename = "reconnectJitterMs", default = "default_reconnect_jitter_ms")]
    pub jitter_ms: u64,
    #[serde(default = "default_max_reconnects")]
    pub max_reconnects: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_reconnect_wait_ms(),
            jitter_ms: default_reconnect_jitter_ms(),
            max_reconnects: default_max_reconnects(),
        }
    }
}
