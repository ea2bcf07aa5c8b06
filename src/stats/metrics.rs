//! Statistics for the broadcast hub

use std::time::Duration;

/// Hub-wide statistics, as seen by the registry loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubStats {
    /// Consumers currently in the live set
    pub live_consumers: usize,
    /// Consumers ever attached
    pub total_attached: u64,
    /// Publish requests processed
    pub messages_published: u64,
    /// Messages placed into mailboxes (one per consumer per publish)
    pub deliveries: u64,
    /// Messages discarded by the drop-oldest policy
    pub messages_dropped: u64,
    /// Consumers removed because their mailbox was full or abandoned
    pub consumers_evicted: u64,
    /// Time since the registry started
    pub uptime: Duration,
}

impl HubStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average fan-out width per published message
    pub fn average_fanout(&self) -> f64 {
        if self.messages_published > 0 {
            self.deliveries as f64 / self.messages_published as f64
        } else {
            0.0
        }
    }
}
