//! Per-consumer mailboxes
//!
//! A mailbox is the ordered buffer between the registry's fan-out and one
//! consumer's drain loop. It is split in two halves:
//!
//! - [`MailboxWriter`] is held by the registry loop, which is the only writer.
//! - [`Mailbox`] is held by the stream session, which is the only reader.
//!
//! The queue is bounded. `enqueue` never waits: when the queue is full the
//! configured [`OverflowPolicy`] decides between discarding the oldest message
//! and reporting the mailbox as full so the registry can detach the consumer.
//!
//! Once closed, nothing more is accepted, but whatever is already queued is
//! still drained before the reader sees the closed signal.

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::config::OverflowPolicy;

/// Result of an enqueue attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// Message appended
    Queued,
    /// Message appended after discarding the oldest queued message
    DroppedOldest,
    /// Queue is full and the policy forbids dropping; message not appended
    Full,
    /// Mailbox is closed or its reader is gone; message not appended
    Closed,
}

/// Result of a non-blocking dequeue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TryDequeue {
    /// Next message in publish order
    Message(Bytes),
    /// Nothing queued yet, mailbox still open
    Empty,
    /// Closed and fully drained
    Closed,
}

#[derive(Debug, Default)]
struct State {
    queue: VecDeque<Bytes>,
    closed: bool,
    reader_gone: bool,
    dropped: u64,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<State>,
    notify: Notify,
}

/// Create a connected writer/reader pair
pub fn mailbox(capacity: usize, policy: OverflowPolicy) -> (MailboxWriter, Mailbox) {
    let shared = Arc::new(Shared::default());

    let writer = MailboxWriter {
        shared: Arc::clone(&shared),
        capacity: capacity.max(1),
        policy,
    };

    (writer, Mailbox { shared })
}

/// Writing half of a mailbox, owned by the registry loop
#[derive(Debug)]
pub struct MailboxWriter {
    shared: Arc<Shared>,
    capacity: usize,
    policy: OverflowPolicy,
}

impl MailboxWriter {
    /// Append a message, applying the overflow policy if the queue is full
    pub fn enqueue(&self, message: Bytes) -> Enqueued {
        let outcome = {
            let mut state = self.shared.state.lock();

            if state.closed || state.reader_gone {
                return Enqueued::Closed;
            }

            if state.queue.len() >= self.capacity {
                match self.policy {
                    OverflowPolicy::DropOldest => {
                        state.queue.pop_front();
                        state.dropped += 1;
                        state.queue.push_back(message);
                        Enqueued::DroppedOldest
                    }
                    OverflowPolicy::Detach => return Enqueued::Full,
                }
            } else {
                state.queue.push_back(message);
                Enqueued::Queued
            }
        };

        self.shared.notify.notify_one();
        outcome
    }

    /// Close the mailbox, waking a pending reader
    pub fn close(&self) {
        self.shared.state.lock().closed = true;
        self.shared.notify.notify_one();
    }

    /// Number of queued messages
    pub fn len(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of queued messages
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Reading half of a mailbox, owned by exactly one stream session
#[derive(Debug)]
pub struct Mailbox {
    shared: Arc<Shared>,
}

impl Mailbox {
    /// Wait for the next message
    ///
    /// Returns `None` once the mailbox is closed and empty. Never waits on a
    /// closed mailbox.
    pub async fn dequeue(&mut self) -> Option<Bytes> {
        loop {
            match self.try_dequeue() {
                TryDequeue::Message(message) => return Some(message),
                TryDequeue::Closed => return None,
                TryDequeue::Empty => {}
            }

            // Single reader, so a stored permit from notify_one is never lost
            self.shared.notify.notified().await;
        }
    }

    /// Take the next message without waiting
    pub fn try_dequeue(&mut self) -> TryDequeue {
        let mut state = self.shared.state.lock();

        match state.queue.pop_front() {
            Some(message) => TryDequeue::Message(message),
            None if state.closed => TryDequeue::Closed,
            None => TryDequeue::Empty,
        }
    }

    /// Check if the mailbox has been closed (messages may still be queued)
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Number of messages discarded by the drop-oldest policy
    pub fn dropped(&self) -> u64 {
        self.shared.state.lock().dropped
    }
}

impl Drop for Mailbox {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        state.reader_gone = true;
        state.queue.clear();
    }
}
