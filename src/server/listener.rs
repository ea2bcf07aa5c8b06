//! Hub server
//!
//! Binds the stream and ingest listeners and serves both until one fails or
//! the shutdown future resolves.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::registry::Registry;
use crate::server::config::ServerConfig;
use crate::server::{events, ingest};

/// Broadcast hub server
pub struct HubServer {
    config: ServerConfig,
    registry: Registry,
}

impl HubServer {
    /// Create a server and spawn its registry
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: ServerConfig) -> Self {
        let registry = Registry::spawn(config.registry.clone());
        Self { config, registry }
    }

    /// Get a handle to the broadcast registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Router for the consumer-facing listener
    pub fn stream_router(&self) -> Router {
        events::router(
            self.registry.clone(),
            self.config.session.clone(),
            self.config.static_dir.as_deref(),
        )
    }

    /// Router for the producer-facing listener
    pub fn ingest_router(&self) -> Router {
        ingest::router(self.registry.clone(), self.config.max_body_bytes)
    }

    /// Run the server
    ///
    /// This method blocks until a listener fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let stream_listener = TcpListener::bind(self.config.stream_addr).await?;
        let ingest_listener = TcpListener::bind(self.config.ingest_addr).await?;

        self.serve(stream_listener, ingest_listener, shutdown).await
    }

    /// Serve on already-bound listeners
    pub async fn serve<F>(
        &self,
        stream_listener: TcpListener,
        ingest_listener: TcpListener,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(addr = %stream_listener.local_addr()?, "Event stream listening");
        tracing::info!(addr = %ingest_listener.local_addr()?, "Ingest listening");

        let stream_server = axum::serve(
            stream_listener,
            self.stream_router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .into_future();
        let ingest_server = axum::serve(ingest_listener, self.ingest_router()).into_future();

        // Event streams never finish on their own, so shutdown stops accepting
        // instead of waiting for open connections to drain.
        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = async { tokio::try_join!(stream_server, ingest_server) } => {
                result?;
                Ok(())
            }
        }
    }
}
