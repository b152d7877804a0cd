//! Integration test common infrastructure.
//!
//! Provides a dispatcher wired to an in-memory transport so tests can feed
//! protocol events and assert on the commands the warden sends back.

pub mod bot;

#[allow(unused_imports)]
pub use bot::{CHAN, ME, TestBot};
