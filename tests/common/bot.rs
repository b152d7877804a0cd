//! Test harness around a spawned dispatcher.

#![allow(dead_code)]

use slirc_warden::config::Config;
use slirc_warden::dispatch::{Dispatcher, DispatcherHandle, Task};
use slirc_warden::engine::{ChannelUser, Effect, Event, ModeChange, Moderator};
use slirc_warden::transport::{Transport, TransportError};
use std::sync::{Arc, Mutex};

pub const ME: &str = "warden";
pub const CHAN: &str = "#rust";

/// Records every effect the dispatcher sends.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Effect>>>);

impl Transport for Recorder {
    fn send(&self, effect: &Effect) -> Result<(), TransportError> {
        self.0.lock().unwrap().push(effect.clone());
        Ok(())
    }
}

/// A warden with a live dispatcher and a recording connection.
pub struct TestBot {
    pub handle: DispatcherHandle,
    sent: Recorder,
}

/// Parse a config body, prefixing the required connection settings.
pub fn config(body: &str) -> anyhow::Result<Arc<Config>> {
    Ok(Arc::new(full_config(body).parse()?))
}

pub fn full_config(body: &str) -> String {
    format!("host = \"irc.example.net\"\nnick = \"{ME}\"\n{body}")
}

impl TestBot {
    pub fn spawn(config: Arc<Config>) -> Self {
        let (handle, _worker) = Dispatcher::spawn(Moderator::new(config));
        let sent = Recorder::default();
        handle.enqueue(Task::Attach(Box::new(sent.clone())));
        Self { handle, sent }
    }

    /// Spawn, register and receive op in [`CHAN`], discarding the setup
    /// commands.
    pub async fn opped(config: Arc<Config>) -> anyhow::Result<Self> {
        let bot = Self::spawn(config);
        bot.send(Event::Registered { nick: ME.into() });
        bot.send(Event::Join {
            channel: CHAN.into(),
            nick: ME.into(),
            account: None,
        });
        bot.send(Event::Mode {
            target: CHAN.into(),
            modes: vec![ModeChange::plus('o', Some(ME))],
        });
        bot.sent().await?;
        Ok(bot)
    }

    pub fn send(&self, event: Event) {
        assert!(self.handle.event(event), "dispatcher stopped");
    }

    /// Wait for the queue to drain and return what was sent since the last
    /// call.
    pub async fn sent(&self) -> anyhow::Result<Vec<Effect>> {
        anyhow::ensure!(self.handle.flush().await, "dispatcher stopped");
        Ok(std::mem::take(&mut *self.sent.0.lock().unwrap()))
    }

    pub fn join(&self, nick: &str, account: Option<&str>) {
        self.send(Event::Join {
            channel: CHAN.into(),
            nick: nick.into(),
            account: account.map(Into::into),
        });
    }

    pub fn say(&self, nick: &str, text: &str) {
        self.send(Event::Message {
            target: CHAN.into(),
            nick: nick.into(),
            text: text.into(),
        });
    }

    pub fn whois(&self, nick: &str, account: Option<&str>) {
        self.send(Event::Whois {
            nick: nick.into(),
            account: account.map(Into::into),
        });
    }

    pub fn names(&self, users: &[&str]) {
        self.send(Event::UserList {
            channel: CHAN.into(),
            users: users.iter().map(|u| ChannelUser::from_names_entry(u)).collect(),
        });
    }
}
