//! Outbound protocol commands produced by the engine.

use std::fmt;

/// Unified effect type returned by all engine handlers.
///
/// Handlers produce effects; the dispatcher applies them through the
/// transport. Keeping handlers free of I/O makes every policy decision
/// observable in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// JOIN a channel.
    Join { channel: String },
    /// MODE <channel> +o <nick>
    Op { channel: String, nick: String },
    /// MODE <channel> +v <nick>
    Voice { channel: String, nick: String },
    /// MODE <channel> +b <mask>
    Ban { channel: String, mask: String },
    /// KICK <channel> <nick> [:reason]
    Kick {
        channel: String,
        nick: String,
        reason: Option<String>,
    },
    /// NAMES <channel>
    Names { channel: String },
    /// WHOIS <nick>
    Whois { nick: String },
}

impl Effect {
    pub fn op(channel: &str, nick: &str) -> Self {
        Self::Op {
            channel: channel.to_string(),
            nick: nick.to_string(),
        }
    }

    pub fn voice(channel: &str, nick: &str) -> Self {
        Self::Voice {
            channel: channel.to_string(),
            nick: nick.to_string(),
        }
    }

    /// Kick with an optional reason; an empty reason is sent without one.
    pub fn kick(channel: &str, nick: &str, reason: &str) -> Self {
        Self::Kick {
            channel: channel.to_string(),
            nick: nick.to_string(),
            reason: (!reason.is_empty()).then(|| reason.to_string()),
        }
    }

    /// Server-side account ban mask (`$a:<account>`).
    pub fn ban_account(channel: &str, account: &str) -> Self {
        Self::Ban {
            channel: channel.to_string(),
            mask: format!("$a:{account}"),
        }
    }
}

impl fmt::Display for Effect {
    /// Protocol line the effect corresponds to, for logging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join { channel } => write!(f, "JOIN {channel}"),
            Self::Op { channel, nick } => write!(f, "MODE {channel} +o {nick}"),
            Self::Voice { channel, nick } => write!(f, "MODE {channel} +v {nick}"),
            Self::Ban { channel, mask } => write!(f, "MODE {channel} +b {mask}"),
            Self::Kick {
                channel,
                nick,
                reason: Some(reason),
            } => write!(f, "KICK {channel} {nick} :{reason}"),
            Self::Kick { channel, nick, .. } => write!(f, "KICK {channel} {nick}"),
            Self::Names { channel } => write!(f, "NAMES {channel}"),
            Self::Whois { nick } => write!(f, "WHOIS {nick}"),
        }
    }
}
