//! Connection supervisor.
//!
//! Connects with the active config, forwards translated events to the
//! dispatcher, and reconnects with jittered backoff when the connection is
//! lost. Operator status is re-acquired on every new connection.

use super::client::connect;
use super::{EventTranslator, IrcTransport, TransportError};
use crate::config::{Config, ConfigStore, ReconnectConfig};
use crate::dispatch::{DispatcherHandle, Task};
use crate::engine::Event;
use futures_util::StreamExt;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Run connections until the reconnect budget is exhausted.
///
/// Each connection uses the config snapshot current at connect time, so a
/// reloaded host or nick takes effect on the next reconnect.
pub async fn run(store: Arc<ConfigStore>, dispatcher: DispatcherHandle) -> Result<(), TransportError> {
    let mut attempts: u32 = 0;

    loop {
        let config = store.current();
        dispatcher.event(Event::Connecting);

        let mut registered = false;
        let result = connection(&config, &dispatcher, &mut registered).await;
        dispatcher.enqueue(Task::Detach);

        let reason = match result {
            Ok(()) => None,
            Err(e) => {
                error!(error = %e, "Connection error");
                Some(e.to_string())
            }
        };
        dispatcher.event(Event::Closed { reason });

        let Some(next) = next_attempt(attempts, registered, &config.reconnect) else {
            error!(attempts = attempts.saturating_add(1), "Giving up on reconnecting");
            return Err(TransportError::ReconnectsExhausted(config.reconnect.max_reconnects));
        };
        attempts = next;

        let delay = backoff(&config.reconnect);
        info!(attempt = attempts, delay_ms = delay.as_millis() as u64, "Reconnecting");
        tokio::time::sleep(delay).await;
    }
}

/// One connection from connect to close.
async fn connection(
    config: &Config,
    dispatcher: &DispatcherHandle,
    registered: &mut bool,
) -> Result<(), TransportError> {
    info!(host = %config.host, port = config.port, tls = config.tls, nick = %config.nick, "Connecting");

    let mut client = connect(config).await?;
    let mut stream = client.stream()?;
    dispatcher.enqueue(Task::Attach(Box::new(IrcTransport::new(client.sender()))));

    let mut translator = EventTranslator::new();
    while let Some(message) = stream.next().await.transpose()? {
        let Some(event) = translator.translate(&message) else {
            continue;
        };
        if matches!(event, Event::Registered { .. }) {
            *registered = true;
        }
        if !dispatcher.event(event) {
            warn!("Dispatcher stopped, closing connection");
            break;
        }
    }

    Ok(())
}

/// Consecutive failed attempts after a connection ends, or `None` once the
/// budget is spent. A connection that registered counts as a fresh start.
fn next_attempt(attempts: u32, registered: bool, policy: &ReconnectConfig) -> Option<u32> {
    let attempts = if registered {
        1
    } else {
        attempts.saturating_add(1)
    };
    (attempts <= policy.max_reconnects).then_some(attempts)
}

/// Base wait plus uniform jitter.
fn backoff(policy: &ReconnectConfig) -> Duration {
    let jitter = if policy.jitter_ms == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..=policy.jitter_ms)
    };
    Duration::from_millis(policy.wait_ms.saturating_add(jitter))
}
