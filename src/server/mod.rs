//! HTTP surface of the hub
//!
//! Two listeners share one registry: the stream listener serves the page and
//! the event stream to consumers, the ingest listener takes messages from
//! producers.

pub mod config;
pub mod error;
pub mod events;
pub mod ingest;
pub mod listener;

pub use config::ServerConfig;
pub use error::IngestError;
pub use listener::HubServer;
