//! Registry loop
//!
//! The live consumer set is owned by a single task. Every attach, detach and
//! publish arrives as a [`Request`] on one channel and is handled to
//! completion before the next one is read, so membership changes and fan-out
//! are linearizable with respect to each other.

use std::collections::HashMap;
use std::time::Instant;

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};

use super::config::RegistryConfig;
use super::consumer::{ConsumerId, Subscription};
use super::error::RegistryError;
use super::mailbox::{mailbox, Enqueued, MailboxWriter};
use crate::stats::HubStats;

/// A request to the registry loop
#[derive(Debug)]
pub(super) enum Request {
    Attach {
        reply: oneshot::Sender<Result<Subscription, RegistryError>>,
    },
    Detach {
        id: ConsumerId,
    },
    Publish {
        message: Bytes,
        reply: oneshot::Sender<usize>,
    },
    Stats {
        reply: oneshot::Sender<HubStats>,
    },
}

/// State owned by the registry loop
pub(super) struct RegistryActor {
    config: RegistryConfig,
    requests: mpsc::UnboundedReceiver<Request>,
    consumers: HashMap<ConsumerId, MailboxWriter>,
    next_id: u64,
    stats: HubStats,
    started_at: Instant,
}

impl RegistryActor {
    pub(super) fn new(config: RegistryConfig, requests: mpsc::UnboundedReceiver<Request>) -> Self {
        Self {
            config,
            requests,
            consumers: HashMap::new(),
            next_id: 1,
            stats: HubStats::default(),
            started_at: Instant::now(),
        }
    }

    /// Process requests until every `Registry` handle is gone
    pub(super) async fn run(mut self) {
        tracing::debug!(
            mailbox_capacity = self.config.mailbox_capacity,
            overflow_policy = ?self.config.overflow_policy,
            "Registry loop started"
        );

        while let Some(request) = self.requests.recv().await {
            self.handle(request);
        }

        for (_, writer) in self.consumers.drain() {
            writer.close();
        }

        tracing::debug!("Registry loop stopped");
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Attach { reply } => {
                let result = self.attach();
                let id = result.as_ref().ok().map(Subscription::id);

                // Caller went away before the reply; don't keep a mailbox nobody drains
                if reply.send(result).is_err() {
                    if let Some(id) = id {
                        self.detach(id);
                    }
                }
            }
            Request::Detach { id } => {
                self.detach(id);
            }
            Request::Publish { message, reply } => {
                let delivered = self.publish(message);
                let _ = reply.send(delivered);
            }
            Request::Stats { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn attach(&mut self) -> Result<Subscription, RegistryError> {
        let limit = self.config.max_consumers;
        if limit > 0 && self.consumers.len() >= limit {
            tracing::warn!(limit = limit, "Attach rejected: consumer limit reached");
            return Err(RegistryError::CapacityExceeded { limit });
        }

        let id = ConsumerId::new(self.next_id);
        self.next_id += 1;

        let (writer, reader) = mailbox(self.config.mailbox_capacity, self.config.overflow_policy);
        self.consumers.insert(id, writer);
        self.stats.total_attached += 1;

        tracing::info!(
            consumer_id = %id,
            consumers = self.consumers.len(),
            "Added new client"
        );

        Ok(Subscription::new(id, reader))
    }

    /// Remove and close a consumer's mailbox. Unknown ids are ignored.
    fn detach(&mut self, id: ConsumerId) -> bool {
        match self.consumers.remove(&id) {
            Some(writer) => {
                writer.close();
                tracing::info!(
                    consumer_id = %id,
                    consumers = self.consumers.len(),
                    "Removed client"
                );
                true
            }
            None => {
                tracing::trace!(consumer_id = %id, "Detach of unknown consumer ignored");
                false
            }
        }
    }

    fn publish(&mut self, message: Bytes) -> usize {
        let mut delivered = 0;
        let mut evicted = Vec::new();

        for (id, writer) in &self.consumers {
            match writer.enqueue(message.clone()) {
                Enqueued::Queued => delivered += 1,
                Enqueued::DroppedOldest => {
                    delivered += 1;
                    self.stats.messages_dropped += 1;
                    tracing::debug!(consumer_id = %id, "Mailbox full, dropped oldest message");
                }
                Enqueued::Full => {
                    tracing::warn!(consumer_id = %id, "Mailbox full, detaching slow consumer");
                    evicted.push(*id);
                }
                Enqueued::Closed => evicted.push(*id),
            }
        }

        for id in evicted {
            if self.detach(id) {
                self.stats.consumers_evicted += 1;
            }
        }

        self.stats.messages_published += 1;
        self.stats.deliveries += delivered as u64;

        tracing::trace!(
            consumers = delivered,
            bytes = message.len(),
            "Broadcast message"
        );

        delivered
    }

    fn snapshot(&self) -> HubStats {
        HubStats {
            live_consumers: self.consumers.len(),
            uptime: self.started_at.elapsed(),
            ..self.stats.clone()
        }
    }
}
