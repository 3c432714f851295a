//! # Scenario Resolver
//!
//! Pure resolution from `(definition, role, navigation index)` to display
//! content. Total by construction: every input maps to a content value,
//! with the role-default image as the universal fallback.
//!
//! The resolver also extracts any signaling command carried by the
//! selected entry, but never dispatches it — the caller decides whether
//! and how to notify the signaling collaborator.

use stagecast_types::{DisplayContent, Role, SignalCommand};

use crate::definition::{ScenarioDefinition, ScenarioStep};

/// Image field value marking a caption-only entry.
pub const TEXT_SENTINEL: &str = "TEXT";

/// Caption shown for a `TEXT` entry without a description.
pub const NO_DESCRIPTION: &str = "No description available";

/// Prefix every authored image path is normalized under.
const IMAGE_ROOT: &str = "images/";

/// The outcome of resolving one step for one role.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// What the node should display.
    pub content: DisplayContent,
    /// Directional signal the caller may dispatch, if the selected entry
    /// carries one that is actionable for the resolving role.
    pub signal: Option<SignalCommand>,
}

impl Resolution {
    fn content_only(content: DisplayContent) -> Self {
        Self {
            content,
            signal: None,
        }
    }
}

/// Resolve what `role` should display at `navigation_index`.
#[must_use]
pub fn resolve(definition: &ScenarioDefinition, role: Role, navigation_index: usize) -> Resolution {
    let actual_step = definition.actual_step(navigation_index);
    let entries = definition.entries_at(actual_step);

    if entries.is_empty() {
        return Resolution::content_only(DisplayContent::default_for(role));
    }

    // First matching entry wins; duplicates for the same device are ignored.
    let chosen = entries.iter().find(|e| role.matches_device(e.device));

    let Some(chosen) = chosen else {
        if role.is_director() {
            // The director synthesizes a caption on behalf of whichever
            // device entry has text but no director-specific entry.
            if let Some(entry) = entries.iter().find(|e| e.desc.is_some()) {
                return Resolution {
                    content: DisplayContent::Text {
                        content: entry.desc.clone().unwrap_or_default(),
                    },
                    signal: signal_for(entry, role),
                };
            }
            return Resolution::content_only(DisplayContent::Empty);
        }
        return Resolution::content_only(DisplayContent::default_for(role));
    };

    let signal = signal_for(chosen, role);

    // Suppression: when the director has no entry at this step, it will
    // synthesize the caption itself; the device must not render the same
    // text a second time.
    let director_absent = !entries.iter().any(|e| e.device == Role::Director);
    let step_has_desc = entries.iter().any(|e| e.desc.is_some());
    let desc = if !role.is_director() && director_absent && step_has_desc {
        None
    } else {
        chosen.desc.clone()
    };

    Resolution {
        content: classify(chosen, desc, role),
        signal,
    }
}

/// Classify a selected entry (with its possibly suppressed caption) into
/// display content.
fn classify(entry: &ScenarioStep, desc: Option<String>, role: Role) -> DisplayContent {
    if let Some(image) = &entry.image {
        if image.eq_ignore_ascii_case(TEXT_SENTINEL) {
            return DisplayContent::Text {
                content: desc.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            };
        }
        let path = normalize_path(image);
        return match desc {
            Some(text) => DisplayContent::ImageWithText { image: path, text },
            None => DisplayContent::Image { path },
        };
    }
    match desc {
        Some(text) => DisplayContent::Text { content: text },
        None => DisplayContent::default_for(role),
    }
}

fn signal_for(entry: &ScenarioStep, role: Role) -> Option<SignalCommand> {
    entry
        .wled
        .as_deref()
        .and_then(|command| SignalCommand::parse(command, role))
}

/// Prepend the image root unless the authored path already carries it.
fn normalize_path(path: &str) -> String {
    if path.starts_with(IMAGE_ROOT) {
        path.to_string()
    } else {
        format!("{IMAGE_ROOT}{path}")
    }
}
