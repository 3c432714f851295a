//! # stagecast-scenario
//!
//! Scenario resolution engine for the stagecast display fleet.
//!
//! ## Role in System
//!
//! - **Definition**: parses a scenario identifier into an immutable,
//!   step-grouped table of per-device display instructions.
//! - **Resolver**: a pure function from `(definition, role, navigation
//!   index)` to display content, encapsulating the precedence and
//!   cross-device suppression rules.
//! - **Cache**: a single-slot per-node cache invalidated only when a
//!   different scenario identifier becomes active.
//!
//! Loading and resolution are total: a missing file yields an empty
//! definition with one synthetic step, malformed lines are skipped with a
//! warning, and every `(definition, role, index)` triple resolves to a
//! display content value.

pub mod cache;
pub mod definition;
pub mod loader;
pub mod resolver;

pub use cache::ScenarioCache;
pub use definition::{ScenarioDefinition, ScenarioStep, DEFAULT_STEP_SECS};
pub use loader::{available_scenarios, load, parse_str};
pub use resolver::{resolve, Resolution, NO_DESCRIPTION, TEXT_SENTINEL};
