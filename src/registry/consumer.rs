//! Consumer handles
//!
//! A `ConsumerId` names one attached mailbox for the lifetime of the process.
//! Ids are never reused, so a stale handle can only ever miss.

use bytes::Bytes;

use super::mailbox::Mailbox;

/// Unique identifier for an attached consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsumerId(u64);

impl ConsumerId {
    /// Create an id from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "consumer-{}", self.0)
    }
}

/// A successful attach: the consumer's handle plus the mailbox to drain
#[derive(Debug)]
pub struct Subscription {
    id: ConsumerId,
    mailbox: Mailbox,
}

impl Subscription {
    pub(super) fn new(id: ConsumerId, mailbox: Mailbox) -> Self {
        Self { id, mailbox }
    }

    /// Handle identifying this consumer in the registry
    pub fn id(&self) -> ConsumerId {
        self.id
    }

    /// Wait for the next message (`None` once detached and drained)
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.mailbox.dequeue().await
    }

    /// Mutable access to the underlying mailbox
    pub fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    /// Split into handle and mailbox
    pub fn into_parts(self) -> (ConsumerId, Mailbox) {
        (self.id, self.mailbox)
    }
}
