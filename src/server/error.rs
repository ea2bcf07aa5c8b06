//! Endpoint errors and their HTTP mapping
//!
//! Failures are reported to the caller here and never reach the registry
//! loop.

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::registry::RegistryError;
use crate::session::SessionError;

/// Error type for the ingest endpoint
#[derive(Debug)]
pub enum IngestError {
    /// Anything but POST
    MethodNotAllowed(Method),
    /// Declared body length over the configured limit
    PayloadTooLarge {
        /// Configured limit in bytes
        limit: usize,
    },
    /// The body could not be read
    BodyRead(axum::Error),
    /// The registry is gone
    Registry(RegistryError),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::MethodNotAllowed(method) => write!(f, "Method not allowed: {}", method),
            IngestError::PayloadTooLarge { limit } => {
                write!(f, "Payload larger than {} bytes", limit)
            }
            IngestError::BodyRead(e) => write!(f, "Error reading body: {}", e),
            IngestError::Registry(e) => write!(f, "Registry error: {}", e),
        }
    }
}

impl std::error::Error for IngestError {}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        match self {
            IngestError::MethodNotAllowed(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "POST")],
                "You can only POST here.",
            )
                .into_response(),
            IngestError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large").into_response()
            }
            IngestError::BodyRead(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error reading body").into_response()
            }
            IngestError::Registry(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Broadcast unavailable").into_response()
            }
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = match self {
            SessionError::StreamingUnsupported | SessionError::Disconnected => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SessionError::Registry(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_allowed_is_client_error() {
        let response = IngestError::MethodNotAllowed(Method::GET).into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.status().is_client_error());
        assert_eq!(response.headers()[header::ALLOW], "POST");
    }

    #[test]
    fn test_registry_errors_map_to_unavailable() {
        let response = IngestError::Registry(RegistryError::Closed).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response =
            SessionError::Registry(RegistryError::CapacityExceeded { limit: 10 }).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_streaming_unsupported_is_server_error() {
        let response = SessionError::StreamingUnsupported.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
