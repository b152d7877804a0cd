//! Per-channel moderation policy.

use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Key in `kickPatterns` whose rules apply to every sender.
pub const WILDCARD_SENDER: &str = "*";

/// Moderation policy for a single channel.
///
/// Every field is optional in the config file; absent lists default to
/// empty and an absent `banAccountOnSpamJoin` disables join-flood banning.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelPolicy {
    /// Nicknames granted operator after identity verification.
    pub ops: HashSet<String>,
    /// Nicknames granted voice unconditionally.
    pub voiced: HashSet<String>,
    /// `[nick, account]` overrides used for identity verification.
    pub accounts: Vec<(String, String)>,
    /// Nicknames kicked as soon as they join.
    pub kick_on_join: HashSet<String>,
    /// Nicknames exempt from pattern kicks.
    pub kick_ignores: HashSet<String>,
    /// Sender nickname (or `*`) to ordered kick rules.
    pub kick_patterns: HashMap<String, Vec<KickRule>>,
    /// Join-flood account banning.
    pub ban_account_on_spam_join: Option<SpamJoinPolicy>,
}

impl ChannelPolicy {
    /// Account a nickname must be identified to before it is opped.
    ///
    /// Falls back to the nickname itself when no override is configured.
    pub fn account_for<'a>(&'a self, nick: &'a str) -> &'a str {
        self.accounts
            .iter()
            .find(|(account_nick, _)| account_nick == nick)
            .map(|(_, account)| account.as_str())
            .unwrap_or(nick)
    }

    /// Kick rules applicable to `sender`: wildcard rules first, then the
    /// sender's own rules.
    pub fn kick_rules_for<'a>(&'a self, sender: &str) -> impl Iterator<Item = &'a KickRule> {
        let wildcard = self.kick_patterns.get(WILDCARD_SENDER).into_iter().flatten();
        let specific = self.kick_patterns.get(sender).into_iter().flatten();
        wildcard.chain(specific)
    }
}

/// Join-flood policy: ban an account that joins more than `max_joins` times
/// within `interval_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamJoinPolicy {
    pub interval_seconds: u64,
    pub max_joins: usize,
}

/// A compiled message pattern and the reason given when it triggers a kick.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawKickRule")]
pub struct KickRule {
    pattern: Regex,
    reason: String,
}

impl KickRule {
    /// Compile a rule. A missing reason defaults to `/<pattern>/`.
    pub fn new(pattern: &str, reason: Option<String>) -> Result<Self, regex::Error> {
        let compiled = Regex::new(pattern)?;
        Ok(Self {
            reason: reason.unwrap_or_else(|| format!("/{pattern}/")),
            pattern: compiled,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Kick rule as written in the config file: `"pattern"`, `["pattern"]` or
/// `["pattern", "reason"]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawKickRule {
    Pattern(String),
    List(Vec<String>),
}

impl TryFrom<RawKickRule> for KickRule {
    type Error = String;

    fn try_from(raw: RawKickRule) -> Result<Self, Self::Error> {
        let (pattern, reason) = match raw {
            RawKickRule::Pattern(pattern) => (pattern, None),
            RawKickRule::List(parts) => {
                let mut parts = parts.into_iter();
                let Some(pattern) = parts.next() else {
                    return Err("kick rule must contain a pattern".to_string());
                };
                let reason = parts.next();
                if parts.next().is_some() {
                    return Err(format!(
                        "kick rule for /{pattern}/ has more than [pattern, reason]"
                    ));
                }
                (pattern, reason)
            }
        };
        KickRule::new(&pattern, reason)
            .map_err(|e| format!("invalid kick pattern /{pattern}/: {e}"))
    }
}
