//! Connection sinks
//!
//! An [`EventSink`] is the write side of one consumer connection. The session
//! writes framed records to it and watches it for peer-initiated closure.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::error::SessionError;

/// Body stream handed to the HTTP layer
pub type FrameStream = ReceiverStream<Result<Bytes, std::io::Error>>;

/// Future resolving when the peer has closed the connection
pub type ClosedFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Write side of a streaming connection
pub trait EventSink: Send + 'static {
    /// Whether frames reach the peer as soon as they are written
    ///
    /// Sessions refuse to start on sinks that would buffer the whole response.
    fn can_stream(&self) -> bool {
        true
    }

    /// Write one frame and push it to the peer without batching
    fn send(&mut self, frame: Bytes) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Resolves when the peer has gone away
    ///
    /// The returned future does not borrow the sink, so it can run on its own
    /// task alongside the drain loop.
    fn closed(&self) -> ClosedFuture;
}

/// Sink feeding an HTTP response body through a bounded channel
///
/// Each frame becomes its own body chunk, which the server writes out as soon
/// as it is polled. The receiving half is dropped by the server when the
/// connection goes away, which is what `closed()` observes.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Result<Bytes, std::io::Error>>,
}

impl ChannelSink {
    /// Create a sink and the body stream it feeds
    pub fn new(buffer: usize) -> (Self, FrameStream) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, ReceiverStream::new(rx))
    }
}

impl EventSink for ChannelSink {
    async fn send(&mut self, frame: Bytes) -> Result<(), SessionError> {
        self.tx
            .send(Ok(frame))
            .await
            .map_err(|_| SessionError::Disconnected)
    }

    fn closed(&self) -> ClosedFuture {
        let tx = self.tx.clone();
        Box::pin(async move { tx.closed().await })
    }
}
