//! # Scenario Definition
//!
//! The immutable, parsed form of an authored scenario: entries grouped by
//! step number, plus the sparse ordered list of step numbers that actually
//! appear. Authors may skip numbers, so UI navigation works on a 0-based
//! index into `valid_steps` rather than on the literal step values.

use std::collections::BTreeMap;

use stagecast_types::Role;

/// Default display time for a step entry, in seconds.
pub const DEFAULT_STEP_SECS: f32 = 5.0;

/// One authored scenario line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioStep {
    /// Authored step number (sparse, non-negative).
    pub step: u32,
    /// Device the entry is for, or `Role::All` for every device.
    pub device: Role,
    /// Image path, or the `TEXT` sentinel for a caption-only entry.
    pub image: Option<String>,
    /// Directional signaling command, e.g. `client>switch`.
    pub wled: Option<String>,
    /// Display time in seconds.
    pub time_sec: f32,
    /// Caption text.
    pub desc: Option<String>,
}

impl ScenarioStep {
    /// A minimal entry with defaults for every optional field.
    #[must_use]
    pub fn new(step: u32, device: Role) -> Self {
        Self {
            step,
            device,
            image: None,
            wled: None,
            time_sec: DEFAULT_STEP_SECS,
            desc: None,
        }
    }
}

/// An immutable parsed scenario.
///
/// Constructed once per identifier and cached; reconstructed only when a
/// different scenario becomes active.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDefinition {
    id: String,
    name: String,
    steps: BTreeMap<u32, Vec<ScenarioStep>>,
    valid_steps: Vec<u32>,
}

impl ScenarioDefinition {
    /// Build a definition from parsed entries, preserving insertion order
    /// within each step group.
    #[must_use]
    pub fn from_steps(id: impl Into<String>, entries: Vec<ScenarioStep>) -> Self {
        let id = id.into();
        let mut steps: BTreeMap<u32, Vec<ScenarioStep>> = BTreeMap::new();
        for entry in entries {
            steps.entry(entry.step).or_default().push(entry);
        }
        let mut valid_steps: Vec<u32> = steps.keys().copied().collect();
        if valid_steps.is_empty() {
            // A definition with zero entries still exposes one synthetic
            // default step.
            valid_steps.push(0);
        }
        let name = display_name(&id);
        Self {
            id,
            name,
            steps,
            valid_steps,
        }
    }

    /// An empty definition with the single synthetic step 0.
    #[must_use]
    pub fn empty(id: impl Into<String>) -> Self {
        Self::from_steps(id, Vec::new())
    }

    /// Scenario identifier this definition was built from.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name derived from the identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sorted distinct step numbers that actually appear.
    #[must_use]
    pub fn valid_steps(&self) -> &[u32] {
        &self.valid_steps
    }

    /// Number of navigable steps (at least 1).
    #[must_use]
    pub fn maximum_steps(&self) -> usize {
        self.valid_steps.len()
    }

    /// Map a 0-based navigation index to the authored step number.
    ///
    /// Out-of-range indices map to actual step 0, never an error.
    #[must_use]
    pub fn actual_step(&self, navigation_index: usize) -> u32 {
        self.valid_steps.get(navigation_index).copied().unwrap_or(0)
    }

    /// Map an authored step number back to its navigation index.
    #[must_use]
    pub fn navigation_index(&self, actual_step: u32) -> usize {
        self.valid_steps
            .iter()
            .position(|&s| s == actual_step)
            .unwrap_or(0)
    }

    /// All entries authored for an actual step number, in insertion order.
    #[must_use]
    pub fn entries_at(&self, actual_step: u32) -> &[ScenarioStep] {
        self.steps
            .get(&actual_step)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// `dns_lookup` -> `Dns Lookup`.
fn display_name(id: &str) -> String {
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
