//! Error types for the hub

use crate::registry::RegistryError;
use crate::session::SessionError;

/// Crate-level error
#[derive(Debug)]
pub enum Error {
    /// Listener or socket failure
    Io(std::io::Error),
    /// Registry failure
    Registry(RegistryError),
    /// Stream session failure
    Session(SessionError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Registry(e) => write!(f, "Registry error: {}", e),
            Error::Session(e) => write!(f, "Session error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Registry(e) => Some(e),
            Error::Session(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Error::Registry(err)
    }
}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        Error::Session(err)
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
