//! Stream sessions
//!
//! A `StreamSession` bridges one consumer connection to one mailbox:
//!
//! 1. `start` checks that the sink can stream, attaches to the registry and
//!    spawns a watcher that detaches as soon as the peer goes away.
//! 2. `run` drains the mailbox, writing one framed record per message, until
//!    the mailbox reports closed, a write fails, or the session cap elapses.
//!
//! The watcher and the drain loop race to end the session. Both finish by
//! detaching, which the registry treats as idempotent.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::config::SessionConfig;
use super::error::SessionError;
use super::frame;
use super::sink::EventSink;
use crate::registry::{ConsumerId, Mailbox, Registry};

/// Why a session's drain loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Mailbox closed and drained (detached by the watcher, an eviction, or an
    /// administrative detach)
    Detached,
    /// Writing to the connection failed
    Disconnected,
    /// The configured maximum session duration elapsed
    Expired,
}

/// One attached consumer connection
pub struct StreamSession<S: EventSink> {
    id: ConsumerId,
    registry: Registry,
    mailbox: Mailbox,
    sink: S,
    config: SessionConfig,
    peer: Option<SocketAddr>,
    watcher: JoinHandle<()>,
}

impl<S: EventSink> StreamSession<S> {
    /// Attach a new consumer for `sink`
    ///
    /// Fails with `StreamingUnsupported` before touching the registry if the
    /// sink cannot flush incrementally.
    pub async fn start(
        registry: Registry,
        sink: S,
        config: SessionConfig,
        peer: Option<SocketAddr>,
    ) -> Result<Self, SessionError> {
        if !sink.can_stream() {
            tracing::warn!(peer = ?peer, "Streaming unsupported by transport");
            return Err(SessionError::StreamingUnsupported);
        }

        let (id, mailbox) = registry.attach().await?.into_parts();

        let watcher = {
            let registry = registry.clone();
            let closed = sink.closed();
            tokio::spawn(async move {
                closed.await;
                tracing::debug!(consumer_id = %id, "HTTP connection just closed");
                registry.detach(id);
            })
        };

        tracing::debug!(consumer_id = %id, peer = ?peer, "Stream session started");

        Ok(Self {
            id,
            registry,
            mailbox,
            sink,
            config,
            peer,
            watcher,
        })
    }

    /// Handle of this session's consumer
    pub fn id(&self) -> ConsumerId {
        self.id
    }

    /// Remote peer address, if known
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Drain the mailbox onto the connection until the session ends
    pub async fn run(mut self) -> SessionEnd {
        let end = self.drain().await;

        tracing::debug!(
            consumer_id = %self.id,
            peer = ?self.peer,
            reason = ?end,
            "Stream session finished"
        );

        end
    }

    async fn drain(&mut self) -> SessionEnd {
        let cap = until(self.config.max_duration.map(|d| Instant::now() + d));
        tokio::pin!(cap);

        loop {
            let record = tokio::select! {
                biased;

                message = self.mailbox.dequeue() => match message {
                    Some(message) => frame::data(&message),
                    None => return SessionEnd::Detached,
                },
                _ = &mut cap => return SessionEnd::Expired,
                _ = idle(self.config.keepalive_interval) => frame::keepalive(),
            };

            if let Err(e) = self.sink.send(record).await {
                tracing::debug!(consumer_id = %self.id, error = %e, "Write failed");
                return SessionEnd::Disconnected;
            }
        }
    }
}

impl<S: EventSink> Drop for StreamSession<S> {
    fn drop(&mut self) {
        self.watcher.abort();
        self.registry.detach(self.id);
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn idle(interval: Option<Duration>) {
    match interval {
        Some(interval) => tokio::time::sleep(interval).await,
        None => std::future::pending().await,
    }
}
