//! Serial event dispatcher.
//!
//! All engine work runs on a single task that drains an unbounded FIFO
//! mailbox. Producers (the connection reader, the config forwarder) enqueue
//! from anywhere without blocking; tasks run strictly one at a time in
//! enqueue order, so the [`Moderator`] never needs a lock.
//!
//! # Architecture
//!
//! - **State Ownership**: The dispatcher owns the moderator and the current
//!   outbound transport.
//! - **Message Passing**: Everything that touches moderation state arrives as
//!   a [`Task`], including config swaps and transport (re)attachment.
//! - **Continuations**: WHOIS replies are ordinary events, so an identity
//!   check completes inside the same serialized queue as everything else.

use crate::config::Config;
use crate::engine::{Effect, Event, Moderator};
use crate::transport::Transport;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, debug_span, warn};

/// Unit of work for the dispatcher.
pub enum Task {
    /// Run the matching engine handler and apply its effects.
    Event(Event),
    /// Replace the active config snapshot.
    ReplaceConfig(Arc<Config>),
    /// Route subsequent effects through a new connection.
    Attach(Box<dyn Transport>),
    /// Drop the current connection's sink.
    Detach,
    /// Signals once every task enqueued before it has run.
    Flush(oneshot::Sender<()>),
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(event) => f.debug_tuple("Event").field(event).finish(),
            Self::ReplaceConfig(_) => f.write_str("ReplaceConfig"),
            Self::Attach(_) => f.write_str("Attach"),
            Self::Detach => f.write_str("Detach"),
            Self::Flush(_) => f.write_str("Flush"),
        }
    }
}

/// Cheap, cloneable producer side of the mailbox.
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    tx: mpsc::UnboundedSender<Task>,
}

impl DispatcherHandle {
    /// Queue a task. Returns `false` if the dispatcher has stopped.
    pub fn enqueue(&self, task: Task) -> bool {
        self.tx.send(task).is_ok()
    }

    pub fn event(&self, event: Event) -> bool {
        self.enqueue(Task::Event(event))
    }

    /// Forward every config published on `updates` into the queue, so a swap
    /// is ordered with respect to protocol events. Ends when the publisher
    /// or the dispatcher goes away.
    pub fn follow(&self, mut updates: watch::Receiver<Arc<Config>>) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let config = updates.borrow_and_update().clone();
                if !handle.enqueue(Task::ReplaceConfig(config)) {
                    break;
                }
            }
        })
    }

    /// Wait until every task queued so far has been processed.
    pub async fn flush(&self) -> bool {
        let (done_tx, done_rx) = oneshot::channel();
        if !self.enqueue(Task::Flush(done_tx)) {
            return false;
        }
        done_rx.await.is_ok()
    }
}

/// Single-worker executor for moderation tasks.
pub struct Dispatcher {
    moderator: Moderator,
    transport: Option<Box<dyn Transport>>,
}

impl Dispatcher {
    pub fn new(moderator: Moderator) -> Self {
        Self {
            moderator,
            transport: None,
        }
    }

    /// Spawn the worker. It runs until every handle has been dropped and the
    /// mailbox is drained, then hands the moderator back.
    pub fn spawn(moderator: Moderator) -> (DispatcherHandle, JoinHandle<Moderator>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self::new(moderator);
        let worker = tokio::spawn(dispatcher.run(rx));
        (DispatcherHandle { tx }, worker)
    }

    /// The main worker loop.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Task>) -> Moderator {
        while let Some(task) = rx.recv().await {
            self.process(task);
        }
        self.moderator
    }

    fn process(&mut self, task: Task) {
        match task {
            Task::Event(event) => {
                let _span = debug_span!("event", kind = event.kind()).entered();
                let effects = self.moderator.handle(event, Instant::now());
                self.apply(effects);
            }
            Task::ReplaceConfig(config) => {
                debug!(channels = config.channels.len(), "Applying new config");
                self.moderator.replace_config(config);
            }
            Task::Attach(transport) => {
                self.transport = Some(transport);
            }
            Task::Detach => {
                self.transport = None;
            }
            Task::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    /// Send effects in order. A failed send is logged and does not stop the
    /// remaining effects or the queue.
    fn apply(&self, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        let Some(transport) = &self.transport else {
            warn!(dropped = effects.len(), "No connection, dropping effects");
            return;
        };
        for effect in effects {
            debug!(command = %effect, "sending");
            if let Err(e) = transport.send(&effect) {
                warn!(command = %effect, error = %e, "Failed to send command");
            }
        }
    }
}
