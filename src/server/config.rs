//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::registry::RegistryConfig;
use crate::session::SessionConfig;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address of the consumer-facing listener (page + event stream)
    pub stream_addr: SocketAddr,

    /// Address of the producer-facing ingest listener
    pub ingest_addr: SocketAddr,

    /// Largest accepted ingest payload
    pub max_body_bytes: usize,

    /// Directory served under `/static` on the stream listener
    pub static_dir: Option<PathBuf>,

    /// Broadcast registry options
    pub registry: RegistryConfig,

    /// Per-connection stream options
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            stream_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            ingest_addr: SocketAddr::from(([0, 0, 0, 0], 8001)),
            max_body_bytes: 1024 * 1024, // 1MB
            static_dir: None,
            registry: RegistryConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Set the stream listener address
    pub fn stream_addr(mut self, addr: SocketAddr) -> Self {
        self.stream_addr = addr;
        self
    }

    /// Set the ingest listener address
    pub fn ingest_addr(mut self, addr: SocketAddr) -> Self {
        self.ingest_addr = addr;
        self
    }

    /// Set the maximum ingest payload size
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Serve files from `dir` under `/static`
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Set registry options
    pub fn registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    /// Set stream session options
    pub fn session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::registry::OverflowPolicy;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.stream_addr.port(), 8000);
        assert_eq!(config.ingest_addr.port(), 8001);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let stream: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let ingest: SocketAddr = "127.0.0.1:9001".parse().unwrap();
        let config = ServerConfig::default()
            .stream_addr(stream)
            .ingest_addr(ingest)
            .max_body_bytes(4096)
            .static_dir("/srv/static")
            .registry(RegistryConfig::default().overflow_policy(OverflowPolicy::Detach))
            .session(SessionConfig::default().keepalive_interval(Duration::from_secs(20)));

        assert_eq!(config.stream_addr, stream);
        assert_eq!(config.ingest_addr, ingest);
        assert_eq!(config.max_body_bytes, 4096);
        assert_eq!(config.static_dir, Some(PathBuf::from("/srv/static")));
        assert_eq!(config.registry.overflow_policy, OverflowPolicy::Detach);
        assert_eq!(
            config.session.keepalive_interval,
            Some(Duration::from_secs(20))
        );
    }
}
