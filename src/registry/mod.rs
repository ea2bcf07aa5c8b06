//! Broadcast registry
//!
//! The registry owns the set of attached consumers and fans every published
//! message out to each of them. All mutation goes through one task: callers
//! hold a [`Registry`] handle and submit requests; the loop handles them one
//! at a time.
//!
//! # Architecture
//!
//! ```text
//!    [Ingest]               Registry (handle)
//!    publish() ─────────┐   attach() / detach()
//!                       ▼          │
//!              ┌────────────────────┴──────┐
//!              │ RegistryActor (one task)  │
//!              │ consumers: HashMap<       │
//!              │   ConsumerId,             │
//!              │   MailboxWriter>          │
//!              └─────┬──────────┬──────────┘
//!                    │ enqueue  │ enqueue (never waits)
//!                    ▼          ▼
//!                [Mailbox]  [Mailbox]    bounded, per consumer
//!                    │          │
//!                dequeue()  dequeue()
//!                    ▼          ▼
//!             [StreamSession] [StreamSession] ──► HTTP body
//! ```
//!
//! # Overflow
//!
//! A consumer that stops draining cannot slow the loop down: its mailbox is
//! bounded and a full mailbox is handled by [`OverflowPolicy`] without waiting.
//!
//! # Zero-Copy Fan-out
//!
//! Messages are `bytes::Bytes`, so every mailbox holds a reference-counted
//! handle to the same allocation.

mod actor;
pub mod config;
pub mod consumer;
pub mod error;
pub mod hub;
pub mod mailbox;

pub use config::{OverflowPolicy, RegistryConfig};
pub use consumer::{ConsumerId, Subscription};
pub use error::RegistryError;
pub use hub::Registry;
pub use mailbox::{mailbox, Enqueued, Mailbox, MailboxWriter, TryDequeue};
