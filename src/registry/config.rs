//! Registry configuration

/// What the registry does when a consumer's mailbox is full at publish time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Discard the oldest queued message for that consumer to make room
    #[default]
    DropOldest,
    /// Remove the consumer from the live set and close its mailbox
    Detach,
}

/// Configuration for the broadcast registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum number of queued messages per consumer (at least 1)
    pub mailbox_capacity: usize,

    /// Policy applied when a mailbox is full
    pub overflow_policy: OverflowPolicy,

    /// Maximum number of attached consumers (0 = unlimited)
    pub max_consumers: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 64,
            overflow_policy: OverflowPolicy::DropOldest,
            max_consumers: 0, // Unlimited
        }
    }
}

impl RegistryConfig {
    /// Set the per-consumer mailbox capacity
    pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity.max(1);
        self
    }

    /// Set the overflow policy
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Set the maximum number of consumers
    pub fn max_consumers(mut self, max: usize) -> Self {
        self.max_consumers = max;
        self
    }
}
