//! Ingest endpoint
//!
//! Accepts `POST` on any path of the ingest listener and publishes the whole
//! request body, as-is, to every attached consumer.

use axum::body::HttpBody;
use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::Router;

use super::error::IngestError;
use crate::registry::Registry;

#[derive(Clone)]
struct IngestState {
    registry: Registry,
    max_body_bytes: usize,
}

/// Create the ingest router
pub fn router(registry: Registry, max_body_bytes: usize) -> Router {
    Router::new().fallback(handle_ingest).with_state(IngestState {
        registry,
        max_body_bytes,
    })
}

async fn handle_ingest(
    State(state): State<IngestState>,
    request: Request,
) -> Result<StatusCode, IngestError> {
    if request.method() != Method::POST {
        tracing::debug!(method = %request.method(), "Ingest rejected: wrong method");
        return Err(IngestError::MethodNotAllowed(request.method().clone()));
    }

    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .or_else(|| request.body().size_hint().exact());
    if declared.is_some_and(|len| len > state.max_body_bytes as u64) {
        return Err(IngestError::PayloadTooLarge {
            limit: state.max_body_bytes,
        });
    }

    let body = axum::body::to_bytes(request.into_body(), state.max_body_bytes)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Error reading ingest body");
            IngestError::BodyRead(e)
        })?;

    let bytes = body.len();
    let consumers = state
        .registry
        .publish(body)
        .await
        .map_err(IngestError::Registry)?;

    tracing::debug!(bytes = bytes, consumers = consumers, "Message published");

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use bytes::Bytes;
    use tower::ServiceExt;

    use super::*;

    fn request(method: Method, body: &'static str) -> Request {
        Request::builder()
            .method(method)
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_post_publishes_body() {
        let registry = Registry::spawn_default();
        let mut consumer = registry.attach().await.unwrap();

        let response = router(registry.clone(), 1024)
            .oneshot(request(Method::POST, "hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
        assert_eq!(consumer.recv().await, Some(Bytes::from_static(b"hello")));
    }

    #[tokio::test]
    async fn test_any_path_accepted() {
        let registry = Registry::spawn_default();
        let mut consumer = registry.attach().await.unwrap();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/some/hook")
            .body(Body::from("{\"numPods\":1}"))
            .unwrap();

        let response = router(registry, 1024).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            consumer.recv().await,
            Some(Bytes::from_static(b"{\"numPods\":1}"))
        );
    }

    #[tokio::test]
    async fn test_get_rejected_without_publish() {
        let registry = Registry::spawn_default();

        let response = router(registry.clone(), 1024)
            .oneshot(request(Method::GET, ""))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(registry.stats().await.unwrap().messages_published, 0);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_without_publish() {
        let registry = Registry::spawn_default();

        let response = router(registry.clone(), 4)
            .oneshot(request(Method::POST, "too long"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(registry.stats().await.unwrap().messages_published, 0);
    }

    #[tokio::test]
    async fn test_body_read_failure_is_server_error() {
        let registry = Registry::spawn_default();
        let failing = tokio_stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Body::from_stream(failing))
            .unwrap();

        let response = router(registry.clone(), 1024).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(registry.stats().await.unwrap().messages_published, 0);
    }

    #[tokio::test]
    async fn test_publish_with_no_consumers_succeeds() {
        let registry = Registry::spawn_default();

        let response = router(registry.clone(), 1024)
            .oneshot(request(Method::POST, "into the void"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let stats = registry.stats().await.unwrap();
        assert_eq!(stats.messages_published, 1);
        assert_eq!(stats.deliveries, 0);
    }
}
