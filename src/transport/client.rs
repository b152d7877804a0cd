//! `irc` client setup and effect encoding.

use super::{Transport, TransportError};
use crate::config::Config;
use crate::engine::Effect;
use irc::client::Client;
use irc::client::data::Config as IrcConfig;
use irc::client::Sender;
use irc::client::prelude::{Capability, ChannelMode, Command, Mode};

/// extended-join carries the joiner's account; multi-prefix reports both @
/// and + in NAMES.
const CAPABILITIES: &[Capability] = &[Capability::ExtendedJoin, Capability::MultiPrefix];

/// Sends effects over a live connection.
#[derive(Clone)]
pub struct IrcTransport {
    sender: Sender,
}

impl IrcTransport {
    pub fn new(sender: Sender) -> Self {
        Self { sender }
    }
}

impl Transport for IrcTransport {
    fn send(&self, effect: &Effect) -> Result<(), TransportError> {
        self.sender.send(encode(effect))?;
        Ok(())
    }
}

/// Protocol command for an effect.
pub(super) fn encode(effect: &Effect) -> Command {
    match effect {
        Effect::Join { channel } => Command::JOIN(channel.clone(), None, None),
        Effect::Op { channel, nick } => channel_mode(channel, ChannelMode::Oper, nick),
        Effect::Voice { channel, nick } => channel_mode(channel, ChannelMode::Voice, nick),
        Effect::Ban { channel, mask } => channel_mode(channel, ChannelMode::Ban, mask),
        Effect::Kick {
            channel,
            nick,
            reason,
        } => Command::KICK(channel.clone(), nick.clone(), reason.clone()),
        Effect::Names { channel } => Command::NAMES(Some(channel.clone()), None),
        Effect::Whois { nick } => Command::WHOIS(None, nick.clone()),
    }
}

fn channel_mode(channel: &str, mode: ChannelMode, param: &str) -> Command {
    Command::ChannelMODE(
        channel.to_string(),
        vec![Mode::Plus(mode, Some(param.to_string()))],
    )
}

/// Build the `irc` client for the configured server.
pub(super) async fn connect(config: &Config) -> Result<Client, TransportError> {
    let irc_config = IrcConfig {
        nickname: Some(config.nick.clone()),
        username: config.username.clone(),
        server: Some(config.host.clone()),
        port: Some(config.port),
        use_tls: Some(config.tls),
        password: config.password.clone(),
        ..IrcConfig::default()
    };

    let client = Client::from_config(irc_config).await?;
    client.send_cap_req(CAPABILITIES)?;
    client.identify()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_modes() {
        assert_eq!(
            encode(&Effect::op("#rust", "alice")),
            Command::ChannelMODE(
                "#rust".into(),
                vec![Mode::Plus(ChannelMode::Oper, Some("alice".into()))]
            )
        );
        assert_eq!(
            encode(&Effect::voice("#rust", "bob")),
            Command::ChannelMODE(
                "#rust".into(),
                vec![Mode::Plus(ChannelMode::Voice, Some("bob".into()))]
            )
        );
        assert_eq!(
            encode(&Effect::ban_account("#rust", "spam")),
            Command::ChannelMODE(
                "#rust".into(),
                vec![Mode::Plus(ChannelMode::Ban, Some("$a:spam".into()))]
            )
        );
    }

    #[test]
    fn test_encode_queries() {
        assert_eq!(
            encode(&Effect::Join { channel: "#rust".into() }),
            Command::JOIN("#rust".into(), None, None)
        );
        assert_eq!(
            encode(&Effect::Names { channel: "#rust".into() }),
            Command::NAMES(Some("#rust".into()), None)
        );
        assert_eq!(
            encode(&Effect::Whois { nick: "alice".into() }),
            Command::WHOIS(None, "alice".into())
        );
    }

    #[test]
    fn test_requested_capabilities() {
        let names: Vec<&str> = CAPABILITIES.iter().map(AsRef::as_ref).collect();
        assert_eq!(names, vec!["extended-join", "multi-prefix"]);
    }

    #[test]
    fn test_encode_kick_reason() {
        assert_eq!(
            encode(&Effect::kick("#rust", "bob", "no spam")),
            Command::KICK("#rust".into(), "bob".into(), Some("no spam".into()))
        );
        assert_eq!(
            encode(&Effect::kick("#rust", "bob", "")),
            Command::KICK("#rust".into(), "bob".into(), None)
        );
    }
}
