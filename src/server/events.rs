//! Consumer-facing endpoints
//!
//! Routes:
//! - GET `/` - bootstrap page with an `EventSource` client
//! - GET `/events/` - event stream (also `/events` and anything below it)
//! - GET `/static/*` - files from `ServerConfig::static_dir`, when set

use std::net::SocketAddr;
use std::path::Path;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::registry::Registry;
use crate::session::{frame, ChannelSink, SessionConfig, StreamSession};

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Clone)]
struct EventsState {
    registry: Registry,
    session: SessionConfig,
}

/// Create the stream router
pub fn router(registry: Registry, session: SessionConfig, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/", get(index))
        .route("/events", get(stream_events))
        .route("/events/", get(stream_events))
        .route("/events/{*rest}", get(stream_events))
        .with_state(EventsState { registry, session });

    match static_dir {
        Some(dir) => router.nest_service("/static", ServeDir::new(dir)),
        None => router,
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Attach a consumer and stream its mailbox as the response body
async fn stream_events(State(state): State<EventsState>, request: Request) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let (sink, body) = ChannelSink::new(state.session.write_buffer);

    let session = match StreamSession::start(state.registry, sink, state.session, peer).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(peer = ?peer, error = %e, "Event stream refused");
            return e.into_response();
        }
    };

    tokio::spawn(session.run());

    (
        [
            (header::CONTENT_TYPE, frame::CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::registry::{RegistryConfig, RegistryError};

    fn get_request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn wait_for_consumers(registry: &Registry, expected: usize) {
        for _ in 0..200 {
            if registry.consumer_count().await.unwrap() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("consumer count never reached {}", expected);
    }

    #[tokio::test]
    async fn test_index_page() {
        let registry = Registry::spawn_default();

        let response = router(registry, SessionConfig::default(), None)
            .oneshot(get_request("/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(std::str::from_utf8(&body).unwrap().contains("EventSource('/events/')"));
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let registry = Registry::spawn_default();

        let response = router(registry, SessionConfig::default(), None)
            .oneshot(get_request("/nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_event_stream_headers_and_frames() {
        let registry = Registry::spawn_default();

        let response = router(registry.clone(), SessionConfig::default(), None)
            .oneshot(get_request("/events/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONNECTION], "keep-alive");

        // Attached before the response was returned
        assert_eq!(registry.publish("hello").await.unwrap(), 1);

        let mut body = response.into_body().into_data_stream();
        let chunk = tokio_stream::StreamExt::next(&mut body)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&chunk[..], b"data: hello\n\n");
    }

    #[tokio::test]
    async fn test_dropped_response_detaches() {
        let registry = Registry::spawn_default();

        let response = router(registry.clone(), SessionConfig::default(), None)
            .oneshot(get_request("/events"))
            .await
            .unwrap();
        assert_eq!(registry.consumer_count().await.unwrap(), 1);

        drop(response);

        wait_for_consumers(&registry, 0).await;
    }

    #[tokio::test]
    async fn test_capacity_exceeded_refuses_stream() {
        let registry = Registry::spawn(RegistryConfig::default().max_consumers(1));
        let _held = registry.attach().await.unwrap();

        let response = router(registry, SessionConfig::default(), None)
            .oneshot(get_request("/events/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            format!(
                "Registry error: {}",
                RegistryError::CapacityExceeded { limit: 1 }
            )
        );
    }
}
