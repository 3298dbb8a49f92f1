//! Titles canceled during the current run.

use std::collections::HashSet;

/// Once a title is recorded here, create and update for it are refused for
/// the rest of the run. Entries are never removed and nothing is persisted.
#[derive(Debug, Default, Clone)]
pub struct DeletionMemory {
    titles: HashSet<String>,
}

impl DeletionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Record a canceled title. Recording it again has no further effect.
    pub fn record(&mut self, title: &str) {
        if self.titles.insert(title.to_string()) {
            tracing::debug!(title, "Remembering canceled title");
        }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
