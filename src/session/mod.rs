//! Stream sessions
//!
//! Adapts one long-lived streaming connection to one registry mailbox.

pub mod config;
pub mod error;
pub mod frame;
pub mod sink;
pub mod stream;

pub use config::SessionConfig;
pub use error::SessionError;
pub use sink::{ChannelSink, ClosedFuture, EventSink, FrameStream};
pub use stream::{SessionEnd, StreamSession};
