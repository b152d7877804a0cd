//! Inbound protocol events consumed by the engine.

/// A parsed protocol event, already aggregated where the protocol spreads
/// one logical reply over several lines (NAMES, WHOIS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A connection attempt has started.
    Connecting,
    /// Registration completed (RPL_WELCOME) under `nick`.
    Registered { nick: String },
    /// The connection was closed or failed.
    Closed { reason: Option<String> },
    /// `nick` joined `channel`; `account` comes from extended-join.
    Join {
        channel: String,
        nick: String,
        account: Option<String>,
    },
    /// `old` is now known as `new`.
    NickChange { old: String, new: String },
    /// Channel mode change on `target`.
    Mode {
        target: String,
        modes: Vec<ModeChange>,
    },
    /// Complete NAMES listing for `channel`.
    UserList {
        channel: String,
        users: Vec<ChannelUser>,
    },
    /// `kicked` was removed from `channel` by `by`.
    Kick {
        channel: String,
        kicked: String,
        by: Option<String>,
    },
    /// PRIVMSG from `nick` to `target`.
    Message {
        target: String,
        nick: String,
        text: String,
    },
    /// Completed WHOIS for `nick`. `account` is `None` when not identified.
    Whois {
        nick: String,
        account: Option<String>,
    },
}

impl Event {
    /// Short name used in log spans.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Registered { .. } => "registered",
            Self::Closed { .. } => "close",
            Self::Join { .. } => "join",
            Self::NickChange { .. } => "nick",
            Self::Mode { .. } => "mode",
            Self::UserList { .. } => "userlist",
            Self::Kick { .. } => "kick",
            Self::Message { .. } => "privmsg",
            Self::Whois { .. } => "whois",
        }
    }
}

/// A single `+x param` / `-x param` entry of a MODE line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub adding: bool,
    pub mode: char,
    pub param: Option<String>,
}

impl ModeChange {
    pub fn plus(mode: char, param: Option<&str>) -> Self {
        Self {
            adding: true,
            mode,
            param: param.map(ToOwned::to_owned),
        }
    }

    pub fn minus(mode: char, param: Option<&str>) -> Self {
        Self {
            adding: false,
            mode,
            param: param.map(ToOwned::to_owned),
        }
    }

    /// `+o nick`
    pub fn is_op_grant_to(&self, nick: &str) -> bool {
        self.adding && self.mode == 'o' && self.param.as_deref() == Some(nick)
    }
}

/// A channel occupant as reported by NAMES.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUser {
    pub nick: String,
    pub is_op: bool,
    pub is_voiced: bool,
}

impl ChannelUser {
    /// Parse one NAMES entry such as `@+alice` (multi-prefix) or `bob`.
    pub fn from_names_entry(entry: &str) -> Self {
        let nick = entry.trim_start_matches(['~', '&', '@', '%', '+']);
        let prefixes = &entry[..entry.len() - nick.len()];
        Self {
            nick: nick.to_string(),
            is_op: prefixes.contains('@'),
            is_voiced: prefixes.contains('+'),
        }
    }
}
