//! Registry handle
//!
//! `Registry` is the cloneable entry point to the registry loop. Each method
//! submits a request and, where there is something to report, waits for the
//! loop's reply.

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};

use super::actor::{RegistryActor, Request};
use super::config::RegistryConfig;
use super::consumer::{ConsumerId, Subscription};
use super::error::RegistryError;
use crate::stats::HubStats;

/// Handle to the broadcast registry
///
/// Cheap to clone. The registry loop runs until every handle is dropped.
#[derive(Debug, Clone)]
pub struct Registry {
    requests: mpsc::UnboundedSender<Request>,
}

impl Registry {
    /// Spawn a registry loop with default configuration
    pub fn spawn_default() -> Self {
        Self::spawn(RegistryConfig::default())
    }

    /// Spawn a registry loop on the current tokio runtime
    pub fn spawn(config: RegistryConfig) -> Self {
        let (requests, rx) = mpsc::unbounded_channel();
        tokio::spawn(RegistryActor::new(config, rx).run());
        Self { requests }
    }

    /// Attach a new consumer
    ///
    /// The returned subscription receives every message published after the
    /// attach is processed, in publish order.
    pub async fn attach(&self) -> Result<Subscription, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Attach { reply })?;
        rx.await.map_err(|_| RegistryError::Closed)?
    }

    /// Detach a consumer and close its mailbox
    ///
    /// Does not wait. Detaching an unknown or already detached consumer is a
    /// no-op, so this is safe to call from every cleanup path.
    pub fn detach(&self, id: ConsumerId) {
        let _ = self.submit(Request::Detach { id });
    }

    /// Publish a message to every attached consumer
    ///
    /// Resolves once the message is queued in every live mailbox and returns
    /// how many consumers it was queued for.
    pub async fn publish(&self, message: impl Into<Bytes>) -> Result<usize, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Publish {
            message: message.into(),
            reply,
        })?;
        rx.await.map_err(|_| RegistryError::Closed)
    }

    /// Get a statistics snapshot
    pub async fn stats(&self) -> Result<HubStats, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Stats { reply })?;
        rx.await.map_err(|_| RegistryError::Closed)
    }

    /// Number of consumers currently attached
    pub async fn consumer_count(&self) -> Result<usize, RegistryError> {
        Ok(self.stats().await?.live_consumers)
    }

    fn submit(&self, request: Request) -> Result<(), RegistryError> {
        self.requests
            .send(request)
            .map_err(|_| RegistryError::Closed)
    }
}
