//! JOIN and KICK handling, including join-flood account bans.

use super::{Effect, Moderator};
use crate::config::ChannelPolicy;
use std::time::{Duration, Instant};
use tracing::info;

impl Moderator {
    pub(super) fn on_join(
        &mut self,
        channel: &str,
        nick: &str,
        account: Option<&str>,
        now: Instant,
    ) -> Vec<Effect> {
        let Some(policy) = self.policy(channel) else {
            return Vec::new();
        };

        if self.is_me(nick) {
            info!(channel = %channel, "Joined channel, requesting op");
            return vec![Effect::op(channel, nick)];
        }

        if policy.kick_on_join.contains(nick) {
            info!(channel = %channel, nick = %nick, "Kicking (kickOnJoin)");
            return vec![Effect::kick(channel, nick, "")];
        }

        let mut effects = self.set_user_modes(channel, nick, false, false);
        effects.extend(self.ban_account_on_spam_join(channel, nick, account, now));
        effects
    }

    /// Record the join in the ledger and ban the account if it has joined
    /// more than the channel allows within its window.
    fn ban_account_on_spam_join(
        &mut self,
        channel: &str,
        nick: &str,
        account: Option<&str>,
        now: Instant,
    ) -> Vec<Effect> {
        let Some(policy) = self.config.channel(channel) else {
            return Vec::new();
        };
        let Some(spam) = policy.ban_account_on_spam_join else {
            return Vec::new();
        };
        let Some(account) = account else {
            return Vec::new();
        };
        if is_configured_op(policy, nick) {
            return Vec::new();
        }

        let window = Duration::from_secs(spam.interval_seconds);
        let joins = self.ledger.record(account, now, window);
        if joins <= spam.max_joins {
            return Vec::new();
        }

        info!(
            channel = %channel,
            nick = %nick,
            account = %account,
            joins,
            interval_seconds = spam.interval_seconds,
            "Banning account for join flood"
        );
        self.ledger.forget(account);
        vec![
            Effect::ban_account(channel, account),
            Effect::kick(channel, nick, ""),
        ]
    }

    pub(super) fn on_kick(&mut self, channel: &str, kicked: &str, by: Option<&str>) -> Vec<Effect> {
        if !self.is_me(kicked) {
            return Vec::new();
        }

        info!(channel = %channel, by = by.unwrap_or("*"), "Kicked, rejoining");
        self.ops_held.remove(channel);
        vec![Effect::Join {
            channel: channel.to_string(),
        }]
    }
}

fn is_configured_op(policy: &ChannelPolicy, nick: &str) -> bool {
    policy.ops.contains(nick)
}
