//! # In-Memory Channel
//!
//! `tokio::sync::broadcast` implementation of the channel ports. Suitable
//! for tests and for running a whole fleet inside one process; distributed
//! deployments use the TCP transport against the relay.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use stagecast_types::StateMessage;

use crate::channel::{ChannelError, StatePublisher, StateSubscription};
use crate::DEFAULT_CHANNEL_CAPACITY;

/// In-memory broadcast channel.
///
/// Cloning shares the underlying channel; every clone publishes into the
/// same stream and can mint new subscriptions.
#[derive(Debug, Clone)]
pub struct InMemoryChannel {
    sender: broadcast::Sender<StateMessage>,
}

impl InMemoryChannel {
    /// Create a channel with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a channel with a specific per-subscriber buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Open a new subscription receiving every subsequently published
    /// message (no catch-up for earlier ones).
    #[must_use]
    pub fn subscribe(&self) -> MemorySubscription {
        MemorySubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatePublisher for InMemoryChannel {
    async fn publish(&self, message: &StateMessage) -> Result<(), ChannelError> {
        match self.sender.send(message.clone()) {
            Ok(receivers) => {
                debug!(command = ?message.command, receivers, "State message published");
                Ok(())
            }
            Err(_) => {
                warn!(command = ?message.command, "State message dropped (no subscribers)");
                Ok(())
            }
        }
    }
}

/// A subscription handle on the in-memory channel.
pub struct MemorySubscription {
    receiver: broadcast::Receiver<StateMessage>,
}

#[async_trait]
impl StateSubscription for MemorySubscription {
    async fn recv(&mut self) -> Result<StateMessage, ChannelError> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Ok(message),
                Err(broadcast::error::RecvError::Closed) => return Err(ChannelError::Closed),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some messages dropped");
                    continue;
                }
            }
        }
    }
}
