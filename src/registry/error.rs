//! Registry error types
//!
//! Error types for registry operations.

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The live set is at its configured limit; the consumer was not registered
    CapacityExceeded {
        /// Configured maximum number of consumers
        limit: usize,
    },
    /// The registry loop is no longer running
    Closed,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::CapacityExceeded { limit } => {
                write!(f, "Consumer capacity exceeded (limit {})", limit)
            }
            RegistryError::Closed => write!(f, "Registry is closed"),
        }
    }
}

impl std::error::Error for RegistryError {}
