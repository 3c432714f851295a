//! Cross-crate integration flows.

pub mod fleet_sync;
