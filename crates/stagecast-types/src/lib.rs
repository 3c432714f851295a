//! # Stagecast Types Crate
//!
//! This crate contains the data model shared by every stagecast node: the
//! role identities of the display fleet, the replicated `{scenario, step}`
//! state, the resolved display content handed to the rendering collaborator,
//! and the wire envelope broadcast over the state channel.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Tolerant wire format**: incoming snapshots may carry unknown keys;
//!   deserialization ignores them rather than rejecting the message.

pub mod entities;
pub mod errors;
pub mod wire;

pub use entities::{DisplayContent, ReplicatedState, Role, SignalCommand};
pub use errors::RoleParseError;
pub use wire::{Command, StateMessage, StateSnapshot, STATE_CHANNEL};
