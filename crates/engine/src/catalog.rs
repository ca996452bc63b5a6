use crate::error::{EngineError, Result};
use crate::levels::builtin_levels;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One stage of the game: a filesystem snapshot with a password hidden in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub welcome: String,
    pub hint: String,
    pub solution: String,
    /// Initial filesystem contents (path → file content).
    pub files: BTreeMap<String, String>,
}

/// Ordered, immutable set of levels. Indices are contiguous from zero.
#[derive(Debug, Clone)]
pub struct Catalog {
    levels: Vec<Level>,
}

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| {
    Arc::new(Catalog {
        levels: builtin_levels(),
    })
});

impl Catalog {
    pub fn new(levels: Vec<Level>) -> Result<Self> {
        if levels.is_empty() {
            return Err(EngineError::InvalidCatalog(
                "catalog must contain at least one level".to_string(),
            ));
        }
        for (position, level) in levels.iter().enumerate() {
            if level.index != position {
                return Err(EngineError::InvalidCatalog(format!(
                    "level '{}' has index {} but sits at position {position}",
                    level.title, level.index
                )));
            }
            if level.solution.trim().is_empty() {
                return Err(EngineError::InvalidCatalog(format!(
                    "level {position} has an empty solution"
                )));
            }
        }
        Ok(Self { levels })
    }

    /// The levels shipped with the game.
    pub fn builtin() -> Arc<Catalog> {
        Arc::clone(&BUILTIN)
    }

    pub fn get(&self, index: usize) -> Result<&Level> {
        self.levels
            .get(index)
            .ok_or(EngineError::LevelNotFound(index))
    }

    pub fn count(&self) -> usize {
        self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}
