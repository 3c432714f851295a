//! # TCP Channel
//!
//! Relay client for distributed fleets. Each node keeps one TCP connection
//! to the relay; messages are single-line UTF-8 JSON frames separated by
//! newlines. The relay echoes every frame to all connections (sender
//! included), so receivers filter on `source_role` themselves.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{info, warn};

use stagecast_types::StateMessage;

use crate::channel::{ChannelError, StatePublisher, StateSubscription};

/// Connector for the relay transport.
pub struct TcpChannel;

impl TcpChannel {
    /// Connect to the relay, yielding the node's publisher/subscription
    /// pair for the shared channel.
    ///
    /// # Errors
    ///
    /// `ChannelError::Connect` when the relay is unreachable; callers
    /// treat this as fatal at startup.
    pub async fn connect(addr: &str) -> Result<(TcpPublisher, TcpSubscription), ChannelError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ChannelError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        info!(addr, "Connected to state relay");
        let (read_half, write_half) = stream.into_split();
        let publisher = TcpPublisher {
            writer: Mutex::new(write_half),
        };
        let subscription = TcpSubscription {
            lines: BufReader::new(read_half).lines(),
        };
        Ok((publisher, subscription))
    }
}

/// Publishing half of a relay connection.
pub struct TcpPublisher {
    writer: Mutex<OwnedWriteHalf>,
}

#[async_trait]
impl StatePublisher for TcpPublisher {
    async fn publish(&self, message: &StateMessage) -> Result<(), ChannelError> {
        let mut frame = serde_json::to_string(message)?;
        frame.push('\n');
        let mut writer = self.writer.lock().await;
        writer.write_all(frame.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}

/// Subscribing half of a relay connection.
pub struct TcpSubscription {
    lines: Lines<BufReader<OwnedReadHalf>>,
}

#[async_trait]
impl StateSubscription for TcpSubscription {
    async fn recv(&mut self) -> Result<StateMessage, ChannelError> {
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Err(ChannelError::Closed);
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<StateMessage>(line) {
                Ok(message) => return Ok(message),
                Err(err) => {
                    // A malformed frame poisons one message, not the loop.
                    warn!(error = %err, "Discarding undecodable state message");
                    continue;
                }
            }
        }
    }
}
