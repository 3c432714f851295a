//! # stagecast-node
//!
//! The runtime every screen in the fleet runs.
//!
//! ## Role in System
//!
//! - **State manager**: owns the replicated `{scenario, step}` record and
//!   the definition cache behind one mutex; the single mutation entry
//!   point serializes director actions against the background receive
//!   loop.
//! - **Subscriber loop**: one long-lived task per node applying received
//!   snapshots; transport loss is fatal to the process, per the channel's
//!   no-reconnect contract.
//! - **Collaborator ports**: rendering and signaling are consumed through
//!   narrow traits; their failures are caught at the boundary and logged,
//!   never propagated into replication or resolution.
//!
//! The director role additionally publishes a snapshot for every state
//! change and drives its own display immediately, without waiting for the
//! broadcast to come back around.

pub mod adapters;
pub mod config;
pub mod ports;
pub mod service;
pub mod state;

pub use adapters::{LoggingDisplay, LoggingSignal};
pub use config::NodeConfig;
pub use ports::{DisplaySink, SignalSink, SinkError};
pub use service::run_subscriber;
pub use state::StateManager;
