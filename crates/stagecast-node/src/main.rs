//! # Stagecast Node
//!
//! The binary every screen in the fleet runs. A device node connects to
//! the relay, shows its role-default image, and then follows whatever the
//! director broadcasts. The director node additionally offers a console
//! for driving scenarios.
//!
//! The role comes from the first argument or `STAGECAST_ROLE`; everything
//! else has defaults overridable via flags or environment (see
//! `NodeConfig`).

mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stagecast_node::{config, run_subscriber, LoggingDisplay, LoggingSignal, NodeConfig, StateManager};
use stagecast_sync::TcpChannel;
use stagecast_types::Role;

/// Stagecast display node
#[derive(Parser, Debug)]
#[command(name = "stagecast-node")]
#[command(about = "Synchronized display node for scripted demonstrations")]
struct Args {
    /// Role to run as: firewall, main, switch, router, dns, server, client
    role: Option<String>,

    /// State relay address
    #[arg(long)]
    relay: Option<String>,

    /// Directory holding scenario files
    #[arg(long)]
    scenario_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut node_config = NodeConfig::from_env();
    if let Some(relay) = args.relay {
        node_config.relay_addr = relay;
    }
    if let Some(dir) = args.scenario_dir {
        node_config.scenario_dir = dir;
    }

    let role = match &args.role {
        Some(raw) => raw
            .parse::<Role>()
            .with_context(|| format!("invalid role '{raw}'"))?,
        None => config::role_from_env()
            .context("no role given: pass one as the first argument or set STAGECAST_ROLE")?,
    };
    if role == Role::All {
        bail!("'all' is a scenario wildcard, not a node role");
    }

    info!(%role, relay = %node_config.relay_addr, "Starting stagecast node");

    let (publisher, subscription) = TcpChannel::connect(&node_config.relay_addr)
        .await
        .context(
            "could not reach the state relay; start stagecast-relay or point \
             STAGECAST_RELAY_ADDR / --relay at it",
        )?;

    let manager = Arc::new(StateManager::new(
        role,
        node_config.clone(),
        Arc::new(publisher),
        Arc::new(LoggingDisplay),
        Arc::new(LoggingSignal),
    ));
    manager.show_initial_display();

    let subscriber = tokio::spawn(run_subscriber(Arc::clone(&manager), subscription));

    if role.is_director() {
        let console = console::run(Arc::clone(&manager), node_config.scenario_dir.clone());
        tokio::select! {
            result = console => {
                result.context("director console failed")?;
                info!("Console closed, shutting down");
            }
            result = subscriber => {
                result.context("subscriber task failed")?
                    .context("lost connection to the state relay")?;
            }
        }
    } else {
        subscriber
            .await
            .context("subscriber task failed")?
            .context("lost connection to the state relay")?;
    }

    Ok(())
}
