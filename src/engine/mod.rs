//! Moderation engine.
//!
//! The [`Moderator`] owns all moderation state (active config snapshot,
//! operator status per channel, join-flood ledger, pending identity lookups)
//! and turns each inbound [`Event`] into a list of [`Effect`]s. It performs
//! no I/O; the dispatcher feeds it events one at a time and applies the
//! effects it returns.
//!
//! Handlers are split by concern:
//! - [`membership`]: join, kick and join-flood banning
//! - [`privileges`]: auto-op/voice, mode changes, user lists, identity replies
//! - [`message`]: pattern kicks

mod effect;
mod event;
mod flood;
mod membership;
mod message;
mod privileges;

pub use effect::Effect;
pub use event::{ChannelUser, Event, ModeChange};
pub use flood::JoinLedger;

use crate::config::{ChannelPolicy, Config};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Channel moderation state machine.
#[derive(Debug)]
pub struct Moderator {
    config: Arc<Config>,
    /// Our current nickname; `None` until registration completes.
    me: Option<String>,
    /// Channels where we have confirmed operator status.
    ops_held: HashSet<String>,
    ledger: JoinLedger,
    /// Nick -> channels waiting on that nick's WHOIS before granting +o.
    pending_whois: HashMap<String, BTreeSet<String>>,
}

impl Moderator {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            me: None,
            ops_held: HashSet::new(),
            ledger: JoinLedger::new(),
            pending_whois: HashMap::new(),
        }
    }

    /// Handle one event at time `now`.
    pub fn handle(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        match event {
            Event::Connecting => {
                info!("Connecting to IRC server...");
                Vec::new()
            }
            Event::Registered { nick } => self.on_registered(nick),
            Event::Closed { reason } => {
                self.on_closed(reason.as_deref());
                Vec::new()
            }
            Event::Join {
                channel,
                nick,
                account,
            } => self.on_join(&channel, &nick, account.as_deref(), now),
            Event::NickChange { old, new } => self.on_nick(&old, &new),
            Event::Mode { target, modes } => self.on_mode(&target, &modes),
            Event::UserList { channel, users } => self.on_user_list(&channel, &users),
            Event::Kick {
                channel,
                kicked,
                by,
            } => self.on_kick(&channel, &kicked, by.as_deref()),
            Event::Message { target, nick, text } => self.on_message(&target, &nick, &text),
            Event::Whois { nick, account } => self.on_whois(&nick, account.as_deref()),
        }
    }

    /// Swap in a new configuration snapshot.
    ///
    /// Operator status and the join ledger are connection facts, not config,
    /// so they survive the swap.
    pub fn replace_config(&mut self, config: Arc<Config>) {
        self.config = config;
    }

    pub fn nick(&self) -> Option<&str> {
        self.me.as_deref()
    }

    pub fn has_op(&self, channel: &str) -> bool {
        self.ops_held.contains(channel)
    }

    pub fn ledger(&self) -> &JoinLedger {
        &self.ledger
    }

    fn is_me(&self, nick: &str) -> bool {
        self.me.as_deref() == Some(nick)
    }

    fn policy(&self, channel: &str) -> Option<&ChannelPolicy> {
        self.config.channel(channel)
    }

    fn on_registered(&mut self, nick: String) -> Vec<Effect> {
        info!(nick = %nick, "Connected to IRC server!");
        self.me = Some(nick);

        self.config
            .channels
            .keys()
            .map(|channel| {
                info!(channel = %channel, "Joining...");
                Effect::Join {
                    channel: channel.clone(),
                }
            })
            .collect()
    }

    fn on_closed(&mut self, reason: Option<&str>) {
        warn!(reason = reason.unwrap_or("unknown"), "Connection to IRC server was closed!");
        // Operator status does not carry over to the next connection.
        self.ops_held.clear();
        self.pending_whois.clear();
    }
}
