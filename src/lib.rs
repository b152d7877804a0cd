//! slirc-warden - Straylight channel warden.
//!
//! An IRC client that holds operator status in its channels and enforces
//! per-channel policy: identity-checked auto-op, auto-voice, kick-on-join,
//! regex message kicks and join-flood account bans.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod transport;
