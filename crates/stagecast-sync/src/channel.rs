//! # Channel Ports
//!
//! The publishing and subscribing sides of the state channel, as traits so
//! the node runtime stays transport-agnostic.

use async_trait::async_trait;
use thiserror::Error;

use stagecast_types::StateMessage;

/// Errors from state channel operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Could not reach the relay at startup.
    #[error("could not connect to state relay at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The channel was closed by the remote end.
    #[error("state channel closed")]
    Closed,

    /// Transport failure mid-run.
    #[error("state channel I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A state message could not be serialized.
    #[error("could not encode state message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Trait for broadcasting state messages to the fleet.
///
/// Only the director role publishes; a publish with no listeners is not an
/// error (the director keeps driving its own display).
#[async_trait]
pub trait StatePublisher: Send + Sync {
    /// Publish a message on the shared channel.
    async fn publish(&self, message: &StateMessage) -> Result<(), ChannelError>;
}

/// Trait for the long-lived blocking receive side of the channel.
#[async_trait]
pub trait StateSubscription: Send {
    /// Receive the next message, waiting as long as it takes.
    ///
    /// An error is unrecoverable for this subscription; callers treat it
    /// as fatal to the receive loop.
    async fn recv(&mut self) -> Result<StateMessage, ChannelError>;
}
