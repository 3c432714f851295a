//! # Scenario Loader
//!
//! Parses the line-oriented scenario format:
//!
//! ```text
//! step;device;image;wled;time_sec;desc;
//! ```
//!
//! `#`-prefixed and blank lines are ignored. Only `step` and `device` are
//! mandatory; trailing fields may be omitted. Parsing degrades per line: a
//! malformed line is skipped with a warning and never aborts the rest of
//! the file, and a missing file yields an empty definition.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

use stagecast_types::Role;

use crate::definition::{ScenarioDefinition, ScenarioStep, DEFAULT_STEP_SECS};

/// Field value treated as an absent field.
const NULL_SENTINEL: &str = "null";

/// File extension of authored scenarios.
const SCENARIO_EXT: &str = "txt";

/// Path of the file backing a scenario identifier.
#[must_use]
pub fn scenario_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.{SCENARIO_EXT}"))
}

/// Load the definition for a scenario identifier.
///
/// A missing or unreadable file is not an error: the result is an empty
/// definition exposing the single synthetic step 0.
#[must_use]
pub fn load(dir: &Path, id: &str) -> ScenarioDefinition {
    let path = scenario_path(dir, id);
    match fs::read_to_string(&path) {
        Ok(contents) => parse_str(id, &contents),
        Err(err) => {
            warn!(scenario = id, path = %path.display(), error = %err, "Scenario file not readable, using empty definition");
            ScenarioDefinition::empty(id)
        }
    }
}

/// Parse scenario file contents into a definition.
#[must_use]
pub fn parse_str(id: &str, contents: &str) -> ScenarioDefinition {
    let mut entries = Vec::new();
    for (index, raw) in contents.lines().enumerate() {
        let line_num = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(entry) = parse_line(id, line_num, line) {
            entries.push(entry);
        }
    }
    ScenarioDefinition::from_steps(id, entries)
}

/// Parse one semicolon-delimited line, or `None` if the line is malformed.
fn parse_line(id: &str, line_num: usize, line: &str) -> Option<ScenarioStep> {
    let parts: Vec<&str> = line.split(';').map(str::trim).collect();
    if parts.len() < 2 {
        warn!(scenario = id, line = line_num, "Skipping line with fewer than two fields");
        return None;
    }

    let step = if parts[0].is_empty() {
        0
    } else {
        match parts[0].parse::<u32>() {
            Ok(step) => step,
            Err(_) => {
                warn!(scenario = id, line = line_num, step = parts[0], "Skipping line with invalid step number");
                return None;
            }
        }
    };

    if parts[1].is_empty() {
        warn!(scenario = id, line = line_num, "Skipping line with missing device");
        return None;
    }
    let device = match Role::from_str(parts[1]) {
        Ok(device) => device,
        Err(_) => {
            warn!(scenario = id, line = line_num, device = parts[1], "Skipping line with unknown device");
            return None;
        }
    };

    let image = optional_field(parts.get(2));
    let wled = optional_field(parts.get(3));

    let time_sec = match parts.get(4).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<f32>().unwrap_or_else(|_| {
            warn!(scenario = id, line = line_num, time_sec = raw, "Invalid time_sec, using default");
            DEFAULT_STEP_SECS
        }),
        None => DEFAULT_STEP_SECS,
    };

    let desc = parts
        .get(5)
        .filter(|s| !s.is_empty())
        .map(|s| (*s).to_string());

    Some(ScenarioStep {
        step,
        device,
        image,
        wled,
        time_sec,
        desc,
    })
}

/// An optional field: empty and the literal `null` (any case) mean absent.
fn optional_field(part: Option<&&str>) -> Option<String> {
    part.filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(NULL_SENTINEL))
        .map(|s| (*s).to_string())
}

/// List authored scenarios in a directory as `(display_name, id)` pairs,
/// sorted by display name. Hidden files and `*_backup` leftovers are
/// skipped.
#[must_use]
pub fn available_scenarios(dir: &Path) -> Vec<(String, String)> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut scenarios = Vec::new();
    for entry in read_dir.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SCENARIO_EXT) {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if id.starts_with('.') || id.ends_with("_backup") {
            continue;
        }
        let definition = ScenarioDefinition::empty(id);
        scenarios.push((definition.name().to_string(), id.to_string()));
    }
    scenarios.sort();
    scenarios
}
