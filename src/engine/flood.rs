//! Join-flood tracking.
//!
//! A single sliding-window ledger of `(account, joined_at)` shared by all
//! channels. Each channel's policy decides the window length and threshold
//! at the moment a join is recorded.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct JoinEntry {
    account: String,
    at: Instant,
}

/// Recent joins, oldest first.
#[derive(Debug, Default)]
pub struct JoinLedger {
    entries: VecDeque<JoinEntry>,
}

impl JoinLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries older than `window`, append this join, and return how many
    /// joins `account` has within the window (including this one).
    pub fn record(&mut self, account: &str, now: Instant, window: Duration) -> usize {
        self.prune(now, window);
        self.entries.push_back(JoinEntry {
            account: account.to_string(),
            at: now,
        });
        self.count(account)
    }

    /// Remove every entry for `account`.
    pub fn forget(&mut self, account: &str) {
        self.entries.retain(|entry| entry.account != account);
    }

    pub fn count(&self, account: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.account == account)
            .count()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn prune(&mut self, now: Instant, window: Duration) {
        // Entries are only ever appended with the current time, so the deque
        // stays ordered and expiry can stop at the first fresh entry.
        while let Some(front) = self.entries.front() {
            if now.saturating_duration_since(front.at) > window {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }
}
