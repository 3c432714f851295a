//! # Node Configuration
//!
//! Runtime parameters for a fleet node. Defaults suit a development
//! machine running the relay locally; production deployments override via
//! environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use stagecast_types::Role;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address of the state relay.
    pub relay_addr: String,
    /// Directory holding the authored scenario files.
    pub scenario_dir: PathBuf,
    /// Delay between steps when the director auto-advances.
    pub auto_advance: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            relay_addr: "127.0.0.1:7878".to_string(),
            scenario_dir: PathBuf::from("scenarios"),
            auto_advance: Duration::from_millis(8000),
        }
    }
}

impl NodeConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    ///
    /// - `STAGECAST_RELAY_ADDR` - relay address
    /// - `STAGECAST_SCENARIO_DIR` - scenario directory
    /// - `STAGECAST_AUTO_ADVANCE_MS` - auto-advance delay in milliseconds
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("STAGECAST_RELAY_ADDR") {
            config.relay_addr = addr;
        }
        if let Ok(dir) = std::env::var("STAGECAST_SCENARIO_DIR") {
            config.scenario_dir = PathBuf::from(dir);
        }
        if let Ok(ms) = std::env::var("STAGECAST_AUTO_ADVANCE_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                config.auto_advance = Duration::from_millis(ms);
            }
        }
        config
    }
}

/// The node's role from `STAGECAST_ROLE`, when set to a known role name.
#[must_use]
pub fn role_from_env() -> Option<Role> {
    std::env::var("STAGECAST_ROLE")
        .ok()
        .and_then(|raw| Role::from_str(&raw).ok())
}
