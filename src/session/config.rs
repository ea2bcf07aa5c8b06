//! Stream session configuration

use std::time::Duration;

/// Per-connection options for stream sessions
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Send a keep-alive comment after this long without a message
    pub keepalive_interval: Option<Duration>,

    /// End the session after this long (the client is expected to reconnect)
    pub max_duration: Option<Duration>,

    /// Frames buffered between the drain loop and the connection
    pub write_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keepalive_interval: None,
            max_duration: None,
            write_buffer: 16,
        }
    }
}

impl SessionConfig {
    /// Set the keep-alive interval
    pub fn keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval = Some(interval);
        self
    }

    /// Cap the session duration
    pub fn max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }

    /// Set the write buffer depth (at least 1)
    pub fn write_buffer(mut self, frames: usize) -> Self {
        self.write_buffer = frames.max(1);
        self
    }
}
