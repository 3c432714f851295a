//! # Domain Entities
//!
//! Core entities of the display fleet: node roles, the replicated state
//! record, resolved display content, and parsed signaling commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::RoleParseError;

/// Path of the director's initialization image.
pub const INIT_IMAGE: &str = "images/000_init.png";

/// Directory holding the per-role default images.
pub const DEVICE_IMAGE_DIR: &str = "images/devices";

/// A node's function in the fleet.
///
/// The director (deployed under the hostname `main`) drives the scenario;
/// every other role is a device screen. `All` is a wildcard device
/// designation used in scenario files — it matches every role during
/// resolution and is never an actual node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Firewall,
    #[serde(rename = "main")]
    Director,
    Switch,
    Router,
    Dns,
    Server,
    Client,
    All,
}

impl Role {
    /// All roles a node can actually run as (excludes the `All` wildcard).
    pub const NODE_ROLES: [Role; 7] = [
        Role::Firewall,
        Role::Director,
        Role::Switch,
        Role::Router,
        Role::Dns,
        Role::Server,
        Role::Client,
    ];

    /// The lowercase name used on the wire and in scenario files.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Role::Firewall => "firewall",
            Role::Director => "main",
            Role::Switch => "switch",
            Role::Router => "router",
            Role::Dns => "dns",
            Role::Server => "server",
            Role::Client => "client",
            Role::All => "all",
        }
    }

    /// Whether this role is the director.
    #[must_use]
    pub fn is_director(self) -> bool {
        self == Role::Director
    }

    /// Whether a scenario entry authored for `device` applies to this role.
    ///
    /// `All` entries apply to every role.
    #[must_use]
    pub fn matches_device(self, device: Role) -> bool {
        device == self || device == Role::All
    }

    /// The image shown when no scenario content is authored for this role.
    #[must_use]
    pub fn default_image(self) -> String {
        if self.is_director() {
            INIT_IMAGE.to_string()
        } else {
            format!("{}/{}.png", DEVICE_IMAGE_DIR, self.wire_name())
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firewall" => Ok(Role::Firewall),
            "main" => Ok(Role::Director),
            "switch" => Ok(Role::Switch),
            "router" => Ok(Role::Router),
            "dns" => Ok(Role::Dns),
            "server" => Ok(Role::Server),
            "client" => Ok(Role::Client),
            "all" => Ok(Role::All),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// The replicated per-node state record.
///
/// The director is the sole authoritative writer; every node (director
/// included) holds a local copy as the read model driving its own display.
/// An empty `scenario` means no scenario is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicatedState {
    /// Identifier of the active scenario; empty when idle.
    pub scenario: String,
    /// Navigation index into the scenario's valid steps.
    pub step: usize,
    /// Identifier of the last scenario a definition was loaded for.
    /// Cache-invalidation marker only, never part of the wire payload.
    pub last_scenario: String,
}

impl ReplicatedState {
    /// Whether no scenario is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.scenario.is_empty()
    }

    /// Replace `{scenario, step}` wholesale from a received snapshot.
    ///
    /// Last-writer-wins: there is no sequencing guard, so a stale snapshot
    /// arriving late will regress the state.
    pub fn apply(&mut self, snapshot: &crate::wire::StateSnapshot) {
        self.scenario = snapshot.scenario.clone();
        self.step = snapshot.step;
    }

    /// Reset to the idle state, clearing the cache marker as well.
    pub fn reset(&mut self) {
        self.scenario.clear();
        self.step = 0;
        self.last_scenario.clear();
    }
}

/// Resolved display content, the sole interface handed to the rendering
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayContent {
    /// Show nothing.
    Empty,
    /// A caption rendered on its own.
    Text { content: String },
    /// An image rendered on its own.
    Image { path: String },
    /// A caption rendered above an image.
    ImageWithText { image: String, text: String },
}

impl DisplayContent {
    /// The role-default image content.
    #[must_use]
    pub fn default_for(role: Role) -> Self {
        DisplayContent::Image {
            path: role.default_image(),
        }
    }
}

/// A parsed directional signaling command, e.g. `client>switch`.
///
/// Produced by the resolver and dispatched by the caller; the resolver
/// itself never talks to the signaling collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalCommand {
    /// Device the signal travels from.
    pub source: Role,
    /// Device the signal travels to.
    pub target: Role,
    /// True when the resolving role is the target, i.e. the animation
    /// should run towards this node.
    pub reverse: bool,
}

impl SignalCommand {
    /// Parse a `source>target` command as seen by `role`.
    ///
    /// Returns `None` when the command is malformed, names an unknown
    /// device, or is not actionable for `role` (the role is neither the
    /// source nor the target).
    #[must_use]
    pub fn parse(command: &str, role: Role) -> Option<Self> {
        let (source, target) = command.split_once('>')?;
        let source = Role::from_str(source).ok()?;
        let target = Role::from_str(target).ok()?;
        if source != role && target != role {
            return None;
        }
        Some(SignalCommand {
            source,
            target,
            reverse: target == role,
        })
    }
}
