//! Pattern kicks on channel messages.

use super::{Effect, Moderator};
use tracing::info;

/// CTCP payloads (ACTION, VERSION, ...) are delimited by `\x01`.
const CTCP_DELIM: char = '\u{1}';

impl Moderator {
    pub(super) fn on_message(&mut self, target: &str, nick: &str, text: &str) -> Vec<Effect> {
        if !self.has_op(target) {
            return Vec::new();
        }
        let Some(policy) = self.policy(target) else {
            return Vec::new();
        };
        if policy.kick_ignores.contains(nick) || text.starts_with(CTCP_DELIM) {
            return Vec::new();
        }

        let Some(rule) = policy.kick_rules_for(nick).find(|rule| rule.is_match(text)) else {
            return Vec::new();
        };

        info!(channel = %target, nick = %nick, reason = %rule.reason(), "Kicking (kickPatterns)");
        vec![Effect::kick(target, nick, rule.reason())]
    }
}
