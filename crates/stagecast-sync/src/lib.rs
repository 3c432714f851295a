//! # Stagecast Sync - State Replication Channel
//!
//! Publish/subscribe plumbing that keeps every node's notion of
//! "current scenario / current step" consistent.
//!
//! ```text
//! ┌──────────────┐                      ┌──────────────┐
//! │   Director   │                      │    Device    │
//! │              │     publish()        │              │
//! │              │ ──────┐              │              │
//! └──────────────┘       │              └──────────────┘
//!                        ▼                      ↑
//!                  ┌──────────────┐            │
//!                  │ State Channel │ ──────────┘
//!                  └──────────────┘   recv()
//! ```
//!
//! The publisher side is used only by the director; the subscriber side by
//! every node. Two transports implement the ports: an in-memory broadcast
//! channel and a TCP client speaking newline-delimited JSON to the relay.
//! The channel gives no ordering guarantee beyond the transport's own
//! delivery order and no replay for late subscribers.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod channel;
pub mod memory;
pub mod tcp;

pub use channel::{ChannelError, StatePublisher, StateSubscription};
pub use memory::{InMemoryChannel, MemorySubscription};
pub use tcp::{TcpChannel, TcpPublisher, TcpSubscription};

/// Maximum messages buffered per subscriber before lag drops the oldest.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
