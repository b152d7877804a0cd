//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Top-level config struct and loading (Config, ReconnectConfig)
//! - [`policy`]: Per-channel moderation policy (ChannelPolicy, KickRule, SpamJoinPolicy)
//! - [`defaults`]: Serde default functions
//! - [`validation`]: Load-time validation
//! - [`store`]: Current snapshot and all-or-nothing reload
//! - [`watcher`]: Reload on file change

mod defaults;
mod policy;
mod store;
mod types;
mod validation;
mod watcher;

pub use policy::{ChannelPolicy, KickRule, SpamJoinPolicy, WILDCARD_SENDER};
pub use store::ConfigStore;
pub use types::{Config, ConfigError, ReconnectConfig};
pub use validation::ValidationError;
pub use watcher::ConfigWatcher;
