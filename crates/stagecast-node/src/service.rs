//! # Subscriber Service
//!
//! The long-lived receive loop every node runs in the background.

use std::sync::Arc;

use tracing::info;

use stagecast_sync::{ChannelError, StateSubscription};
use stagecast_types::STATE_CHANNEL;

use crate::state::StateManager;

/// Drive the node's receive loop until the transport fails.
///
/// Each received message is applied synchronously, so a slow render
/// blocks processing of the next message; back-pressure is whatever the
/// channel's own buffering provides. The returned error is unrecoverable:
/// there is no reconnect, and callers treat it as fatal to the process.
pub async fn run_subscriber<S>(
    manager: Arc<StateManager>,
    mut subscription: S,
) -> Result<(), ChannelError>
where
    S: StateSubscription,
{
    info!(role = %manager.role(), channel = STATE_CHANNEL, "State subscriber running");
    loop {
        let message = subscription.recv().await?;
        manager.apply_remote(&message);
    }
}
