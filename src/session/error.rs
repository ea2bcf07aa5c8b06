//! Session error types

use crate::registry::RegistryError;

/// Error type for stream sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The transport cannot flush incrementally; nothing was attached
    StreamingUnsupported,
    /// The registry refused or could not process the attach
    Registry(RegistryError),
    /// The peer is gone
    Disconnected,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::StreamingUnsupported => write!(f, "Streaming unsupported!"),
            SessionError::Registry(e) => write!(f, "Registry error: {}", e),
            SessionError::Disconnected => write!(f, "Peer disconnected"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Registry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for SessionError {
    fn from(err: RegistryError) -> Self {
        SessionError::Registry(err)
    }
}
