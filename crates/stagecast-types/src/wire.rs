//! # Wire Envelope
//!
//! The message format broadcast on the shared state channel. Each message
//! is a single UTF-8 JSON object; there is no schema version field, and
//! consumers must tolerate unknown keys inside `state`.

use serde::{Deserialize, Serialize};

use crate::entities::Role;

/// Name of the shared publish/subscribe channel.
pub const STATE_CHANNEL: &str = "scenario_updates";

/// Commands a broadcast can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Replace the receiver's `{scenario, step}` state wholesale.
    UpdateState,
    /// Reset the receiver to its role-default display.
    ShowRoleImage,
}

/// The `{scenario, step}` pair carried on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Active scenario identifier; empty when no scenario is active.
    #[serde(default)]
    pub scenario: String,
    /// Navigation index of the current step.
    #[serde(default)]
    pub step: usize,
}

impl StateSnapshot {
    /// Build a snapshot for an active scenario step.
    #[must_use]
    pub fn new(scenario: impl Into<String>, step: usize) -> Self {
        Self {
            scenario: scenario.into(),
            step,
        }
    }
}

/// One broadcast message on the state channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMessage {
    /// Role of the publishing node; receivers discard their own messages.
    pub source_role: Role,
    /// The replicated state snapshot.
    pub state: StateSnapshot,
    /// What the receiver should do with the snapshot.
    pub command: Command,
}

impl StateMessage {
    /// Compose the message a state change publishes.
    ///
    /// An empty scenario means the fleet should fall back to role-default
    /// displays; any other snapshot replicates the step.
    #[must_use]
    pub fn for_snapshot(source_role: Role, state: StateSnapshot) -> Self {
        let command = if state.scenario.is_empty() {
            Command::ShowRoleImage
        } else {
            Command::UpdateState
        };
        Self {
            source_role,
            state,
            command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_names() {
        assert_eq!(
            serde_json::to_string(&Command::UpdateState).unwrap(),
            "\"update_state\""
        );
        assert_eq!(
            serde_json::to_string(&Command::ShowRoleImage).unwrap(),
            "\"show_role_image\""
        );
    }

    #[test]
    fn test_for_snapshot_picks_command() {
        let msg = StateMessage::for_snapshot(Role::Director, StateSnapshot::new("dns_lookup", 2));
        assert_eq!(msg.command, Command::UpdateState);

        let msg = StateMessage::for_snapshot(Role::Director, StateSnapshot::default());
        assert_eq!(msg.command, Command::ShowRoleImage);
    }

    #[test]
    fn test_message_round_trip() {
        let msg = StateMessage::for_snapshot(Role::Director, StateSnapshot::new("http_request", 4));
        let json = serde_json::to_string(&msg).unwrap();
        let back: StateMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_unknown_state_keys_are_tolerated() {
        let json = r#"{
            "source_role": "main",
            "state": {"scenario": "http_request", "step": 1, "last_scenario": "dns_lookup"},
            "command": "update_state"
        }"#;
        let msg: StateMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.state.scenario, "http_request");
        assert_eq!(msg.state.step, 1);
    }

    #[test]
    fn test_missing_step_defaults_to_zero() {
        let json = r#"{"source_role": "main", "state": {"scenario": ""}, "command": "show_role_image"}"#;
        let msg: StateMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.state.step, 0);
    }
}
