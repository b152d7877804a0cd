//! Protocol messages to engine events.

use crate::engine::{ChannelUser, Event, ModeChange};
use irc::client::prelude::{ChannelMode, Command, Message, Mode};
use std::collections::HashMap;

const RPL_WELCOME: u16 = 1;
const RPL_ENDOFWHOIS: u16 = 318;
const RPL_WHOISACCOUNT: u16 = 330;
const RPL_NAMREPLY: u16 = 353;
const RPL_ENDOFNAMES: u16 = 366;

/// Converts a connection's inbound messages into [`Event`]s.
///
/// NAMES and WHOIS replies span several numerics; they are buffered here and
/// surface as one event when the terminating numeric arrives. A translator
/// belongs to a single connection and is dropped with it.
#[derive(Debug, Default)]
pub struct EventTranslator {
    names: HashMap<String, Vec<ChannelUser>>,
    whois_accounts: HashMap<String, String>,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one message. Returns `None` for messages the engine does not
    /// consume and for partial multi-line replies.
    pub fn translate(&mut self, message: &Message) -> Option<Event> {
        let source = message.source_nickname();

        match &message.command {
            Command::JOIN(channel, account, _) => Some(Event::Join {
                channel: channel.clone(),
                nick: source?.to_string(),
                account: account.as_deref().filter(|a| *a != "*").map(ToOwned::to_owned),
            }),
            Command::NICK(new) => Some(Event::NickChange {
                old: source?.to_string(),
                new: new.clone(),
            }),
            Command::ChannelMODE(target, modes) => Some(Event::Mode {
                target: target.clone(),
                modes: modes.iter().filter_map(mode_change).collect(),
            }),
            Command::KICK(channel, kicked, _) => Some(Event::Kick {
                channel: channel.clone(),
                kicked: kicked.clone(),
                by: source.map(ToOwned::to_owned),
            }),
            Command::PRIVMSG(target, text) => Some(Event::Message {
                target: target.clone(),
                nick: source?.to_string(),
                text: text.clone(),
            }),
            command => {
                let (code, args) = numeric(command)?;
                self.on_numeric(code, args)
            }
        }
    }

    fn on_numeric(&mut self, code: u16, args: &[String]) -> Option<Event> {
        match code {
            RPL_WELCOME => Some(Event::Registered {
                nick: args.first()?.clone(),
            }),
            // <me> [symbol] <channel> :<names>
            RPL_NAMREPLY => {
                let (names, rest) = args.split_last()?;
                let channel = rest.last()?;
                self.names
                    .entry(channel.clone())
                    .or_default()
                    .extend(names.split_whitespace().map(ChannelUser::from_names_entry));
                None
            }
            // <me> <channel> :End of /NAMES list
            RPL_ENDOFNAMES => {
                let channel = args.get(1)?;
                Some(Event::UserList {
                    channel: channel.clone(),
                    users: self.names.remove(channel).unwrap_or_default(),
                })
            }
            // <me> <nick> <account> :is logged in as
            RPL_WHOISACCOUNT => {
                let nick = args.get(1)?;
                let account = args.get(2)?;
                self.whois_accounts.insert(nick.clone(), account.clone());
                None
            }
            // <me> <nick> :End of /WHOIS list
            RPL_ENDOFWHOIS => {
                let nick = args.get(1)?;
                Some(Event::Whois {
                    nick: nick.clone(),
                    account: self.whois_accounts.remove(nick),
                })
            }
            _ => None,
        }
    }
}

/// Numeric code and arguments, whether or not the protocol library has a
/// named variant for the numeric.
fn numeric(command: &Command) -> Option<(u16, &[String])> {
    match command {
        Command::Response(response, args) => Some((*response as u16, args.as_slice())),
        Command::Raw(code, args) => {
            let code = code.parse().ok()?;
            Some((code, args.as_slice()))
        }
        _ => None,
    }
}

fn mode_change(mode: &Mode<ChannelMode>) -> Option<ModeChange> {
    let (adding, flag, param) = match mode {
        Mode::Plus(flag, param) => (true, flag, param),
        Mode::Minus(flag, param) => (false, flag, param),
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(ModeChange {
        adding,
        mode: flag.to_string().chars().next()?,
        param: param.clone(),
    })
}
