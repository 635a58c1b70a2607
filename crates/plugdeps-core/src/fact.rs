//! Dependency facts and the aggregate state they accumulate into.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// One dependency declaration found in one scene file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyFact {
    /// Name of the plugin the file depends on. Case-sensitive.
    pub name: CompactString,
    /// File the declaration was read from.
    pub source: PathBuf,
}

impl DependencyFact {
    /// Create a new fact.
    pub fn new(name: impl Into<CompactString>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Settled mapping from dependency name to every file that declared it.
///
/// File lists keep the order in which facts were recorded. That order
/// depends on worker scheduling, so only key order is made deterministic
/// (by [`AggregateState::sorted`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateState {
    entries: HashMap<CompactString, Vec<PathBuf>>,
}

impl AggregateState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files that declared `name`, in arrival order.
    pub fn files(&self, name: &str) -> Option<&[PathBuf]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Number of references to `name` (0 if unknown).
    pub fn count(&self, name: &str) -> usize {
        self.entries.get(name).map_or(0, Vec::len)
    }

    /// Number of distinct dependency names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no facts were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all per-name reference counts.
    pub fn total_references(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Iterate entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    /// Entries sorted by dependency name, ascending.
    pub fn sorted(&self) -> Vec<(&str, &[PathBuf])> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Append a fact. Used when folding facts without a concurrent aggregator.
    pub fn push(&mut self, fact: DependencyFact) {
        self.entries.entry(fact.name).or_default().push(fact.source);
    }

    /// Check whether any entry references `path`.
    pub fn references(&self, path: &Path) -> bool {
        self.entries.values().any(|files| files.iter().any(|f| f == path))
    }
}

impl FromIterator<(CompactString, Vec<PathBuf>)> for AggregateState {
    fn from_iter<I: IntoIterator<Item = (CompactString, Vec<PathBuf>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<DependencyFact> for AggregateState {
    fn from_iter<I: IntoIterator<Item = DependencyFact>>(iter: I) -> Self {
        let mut state = Self::new();
        for fact in iter {
            state.push(fact);
        }
        state
    }
}
