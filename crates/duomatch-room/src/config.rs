//! Matchmaker configuration.

use std::time::Duration;

/// Settings for the matchmaker actor.
///
/// The grace delays exist for UX smoothing, not correctness: they give both
/// clients a moment to finish local setup before roles and the opening turn
/// are announced. Tests shrink them to keep timing deterministic.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Delay between a successful join and the role/turn announcement.
    pub start_grace: Duration,

    /// Delay between a rematch request and the opening-turn signal.
    pub handoff_grace: Duration,

    /// Command channel size. If the channel fills up, connection handlers
    /// wait (bounded backpressure).
    pub command_buffer: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            start_grace: Duration::from_millis(500),
            handoff_grace: Duration::from_millis(500),
            command_buffer: 64,
        }
    }
}
