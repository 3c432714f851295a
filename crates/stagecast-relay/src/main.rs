//! # Stagecast Relay
//!
//! Fan-out broker for the shared state channel. Every node keeps one TCP
//! connection open; each newline-delimited frame a node sends is
//! re-broadcast verbatim to every connection, the sender included (nodes
//! discard their own messages by `source_role`). The relay never inspects
//! frame contents and keeps no history: a node that connects late has
//! missed whatever was broadcast before.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Messages buffered per connection before a slow consumer starts lagging.
const FANOUT_CAPACITY: usize = 64;

/// Stagecast state channel relay
#[derive(Parser, Debug)]
#[command(name = "stagecast-relay")]
#[command(about = "TCP fan-out relay for the stagecast state channel")]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:7878")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("could not bind relay to {}", args.bind))?;
    info!(addr = %args.bind, "Relay listening");

    let (fanout, _) = broadcast::channel::<String>(FANOUT_CAPACITY);

    loop {
        let (stream, peer) = listener.accept().await.context("accept failed")?;
        info!(%peer, "Node connected");
        let fanout = fanout.clone();
        tokio::spawn(async move {
            if let Err(err) = serve_connection(stream, fanout).await {
                debug!(%peer, error = %err, "Connection error");
            }
            info!(%peer, "Node disconnected");
        });
    }
}

/// Pump one connection: inbound frames go to the fan-out channel, fan-out
/// frames go back out. Returns when the node hangs up or the socket fails.
async fn serve_connection(
    stream: TcpStream,
    fanout: broadcast::Sender<String>,
) -> std::io::Result<()> {
    let peer = stream.peer_addr()?;
    let (read_half, mut write_half) = stream.into_split();
    let mut outbound = fanout.subscribe();

    let writer = tokio::spawn(async move {
        loop {
            match outbound.recv().await {
                Ok(mut frame) => {
                    frame.push('\n');
                    if write_half.write_all(frame.as_bytes()).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(%peer, lagged = count, "Slow consumer, dropped frames");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(read_half).lines();
    let result = loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                // A send error only means no connection is listening.
                let _ = fanout.send(line);
            }
            Ok(None) => break Ok(()),
            Err(err) => break Err(err),
        }
    };

    writer.abort();
    result
}
