//! Auto-op and auto-voice.
//!
//! Operator grants are identity-checked: a configured op nick is only opped
//! once a WHOIS shows it is logged in to the expected account. The WHOIS
//! reply comes back through the dispatcher as its own [`Event::Whois`], so
//! the grant decision is made against whatever state and config are current
//! when the reply arrives.
//!
//! [`Event::Whois`]: super::Event::Whois

use super::{ChannelUser, Effect, ModeChange, Moderator};
use tracing::{debug, info};

impl Moderator {
    /// Grant the privileges `nick` is entitled to in `channel` and does not
    /// already hold. No-op unless we hold op there.
    pub(super) fn set_user_modes(
        &mut self,
        channel: &str,
        nick: &str,
        is_op_already: bool,
        is_voiced_already: bool,
    ) -> Vec<Effect> {
        if !self.has_op(channel) {
            return Vec::new();
        }
        let Some(policy) = self.config.channel(channel) else {
            return Vec::new();
        };

        let mut effects = Vec::new();

        if !is_op_already && policy.ops.contains(nick) {
            let waiting = self.pending_whois.entry(nick.to_string()).or_default();
            let first_for_nick = waiting.is_empty();
            if waiting.insert(channel.to_string()) && first_for_nick {
                effects.push(Effect::Whois {
                    nick: nick.to_string(),
                });
            }
        }

        if !is_voiced_already && policy.voiced.contains(nick) {
            info!(channel = %channel, nick = %nick, "Setting +v");
            effects.push(Effect::voice(channel, nick));
        }

        effects
    }

    pub(super) fn on_whois(&mut self, nick: &str, account: Option<&str>) -> Vec<Effect> {
        let Some(channels) = self.pending_whois.remove(nick) else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        for channel in channels {
            if !self.has_op(&channel) {
                continue;
            }
            let Some(policy) = self.config.channel(&channel) else {
                continue;
            };
            if !policy.ops.contains(nick) {
                continue;
            }
            if account != Some(policy.account_for(nick)) {
                debug!(channel = %channel, nick = %nick, account = account.unwrap_or("*"), "Account mismatch, not opping");
                continue;
            }

            info!(channel = %channel, nick = %nick, "Setting +o");
            effects.push(Effect::op(&channel, nick));
        }
        effects
    }

    pub(super) fn on_nick(&mut self, old: &str, new: &str) -> Vec<Effect> {
        if self.is_me(old) {
            info!(old = %old, new = %new, "Our nick changed");
            self.me = Some(new.to_string());
        }

        let channels: Vec<String> = self.config.channels.keys().cloned().collect();
        channels
            .iter()
            .flat_map(|channel| self.set_user_modes(channel, new, false, false))
            .collect()
    }

    pub(super) fn on_mode(&mut self, target: &str, modes: &[ModeChange]) -> Vec<Effect> {
        let Some(me) = self.me.as_deref() else {
            return Vec::new();
        };
        if !modes.iter().any(|m| m.is_op_grant_to(me)) || self.has_op(target) {
            return Vec::new();
        }

        info!(channel = %target, "Op acquired, requesting user list");
        self.ops_held.insert(target.to_string());
        vec![Effect::Names {
            channel: target.to_string(),
        }]
    }

    pub(super) fn on_user_list(&mut self, channel: &str, users: &[ChannelUser]) -> Vec<Effect> {
        if !self.has_op(channel) {
            return Vec::new();
        }

        users
            .iter()
            .flat_map(|user| self.set_user_modes(channel, &user.nick, user.is_op, user.is_voiced))
            .collect()
    }
}
