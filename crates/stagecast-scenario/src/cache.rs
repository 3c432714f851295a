//! # Definition Cache
//!
//! Single-slot per-node cache for the active scenario definition.
//! Definitions are immutable once parsed, so the cache hands out shared
//! references; the slot is replaced only when a different scenario
//! identifier becomes active and cleared when the node goes idle.

use std::path::Path;
use std::sync::Arc;

use crate::definition::ScenarioDefinition;
use crate::loader;

/// Caches the definition of the currently active scenario.
#[derive(Debug, Default)]
pub struct ScenarioCache {
    slot: Option<Arc<ScenarioDefinition>>,
}

impl ScenarioCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The definition for `id`, loading it from `dir` unless the cached
    /// definition already belongs to the same identifier.
    pub fn definition(&mut self, dir: &Path, id: &str) -> Arc<ScenarioDefinition> {
        if let Some(cached) = &self.slot {
            if cached.id() == id {
                return Arc::clone(cached);
            }
        }
        let definition = Arc::new(loader::load(dir, id));
        self.slot = Some(Arc::clone(&definition));
        definition
    }

    /// Identifier of the cached definition, if any.
    #[must_use]
    pub fn cached_id(&self) -> Option<&str> {
        self.slot.as_deref().map(ScenarioDefinition::id)
    }

    /// Drop the cached definition.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
