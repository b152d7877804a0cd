//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Connection Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

// =============================================================================
// Reconnect Defaults
// =============================================================================

/// Base delay before a reconnect attempt.
pub fn default_reconnect_wait_ms() -> u64 {
    2000
}

/// Upper bound of the random delay added on top of the base delay.
pub fn default_reconnect_jitter_ms() -> u64 {
    2000
}

/// Roughly five hours of attempts at the default delays.
pub fn default_max_reconnects() -> u32 {
    9000
}
