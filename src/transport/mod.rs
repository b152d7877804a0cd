//! Connection to the IRC server.
//!
//! The `irc` crate owns the socket, TLS, framing, parsing and PING replies.
//! This module adapts it to the engine:
//! - [`translate`]: protocol messages to engine [`Event`]s
//! - [`client`]: engine [`Effect`]s to protocol commands
//! - [`session`]: connect, read loop, reconnect policy
//!
//! [`Event`]: crate::engine::Event
//! [`Effect`]: crate::engine::Effect

mod client;
mod session;
mod translate;

pub use client::IrcTransport;
pub use session::run;
pub use translate::EventTranslator;

use crate::engine::Effect;
use thiserror::Error;

/// Outbound sink for engine effects.
pub trait Transport: Send {
    fn send(&self, effect: &Effect) -> Result<(), TransportError>;
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("irc error: {0}")]
    Irc(#[from] irc::error::Error),

    #[error("not connected")]
    Detached,

    #[error("gave up after {0} reconnect attempts")]
    ReconnectsExhausted(u32),
}
