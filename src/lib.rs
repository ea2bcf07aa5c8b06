//! # sse-hub
//!
//! A broadcast hub for server-sent events. Producers POST messages to the
//! ingest listener; every consumer attached to the event stream at that
//! moment receives the message, in publish order, as a `data:` record.
//!
//! - [`registry`] - the single-owner registry loop and per-consumer mailboxes
//! - [`session`] - adapts one streaming connection to one mailbox
//! - [`server`] - HTTP endpoints and listeners
//!
//! ```rust,no_run
//! use sse_hub::{HubServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> sse_hub::Result<()> {
//!     let server = HubServer::new(ServerConfig::default());
//!     server
//!         .run_until(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await
//! }
//! ```

pub mod error;
pub mod registry;
pub mod server;
pub mod session;
pub mod stats;

pub use error::{Error, Result};
pub use registry::{ConsumerId, OverflowPolicy, Registry, RegistryConfig, RegistryError};
pub use server::{HubServer, ServerConfig};
pub use session::{SessionConfig, SessionError, StreamSession};
pub use stats::HubStats;
