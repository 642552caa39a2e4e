// src/registry.rs
use std::collections::HashSet;
use std::fmt;

/// Opaque per-game key, unique per (layout family, game). Only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Games that already received an action during this page load.
/// Entries are only ever added; `reset` exists for tests and fresh sessions.
#[derive(Debug, Default, Clone)]
pub struct ProcessedRegistry {
    seen: HashSet<GameId>,
}

impl ProcessedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, id: &GameId) -> bool {
        self.seen.contains(id)
    }

    /// Returns false if the id was already present.
    pub fn add(&mut self, id: GameId) -> bool {
        self.seen.insert(id)
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
