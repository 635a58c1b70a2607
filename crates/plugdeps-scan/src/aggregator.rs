//! Thread-safe accumulation of dependency facts.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use dashmap::DashMap;
use plugdeps_core::{AggregateState, DependencyFact};

/// Concurrent map from dependency name to referencing files.
///
/// Writers only ever append. Each [`record`](Self::record) holds one shard
/// lock for the duration of a single push, never across I/O. Reading is
/// done through [`snapshot`](Self::snapshot), which consumes the
/// aggregator, so the state can only be observed once every writer has
/// released its borrow.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    entries: DashMap<CompactString, Vec<PathBuf>>,
}

impl ResultAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Append `source` to the file list of `name`, creating the entry if needed.
    pub fn record(&self, name: impl Into<CompactString>, source: &Path) {
        self.entries
            .entry(name.into())
            .or_default()
            .push(source.to_path_buf());
    }

    /// Record one extracted fact.
    pub fn record_fact(&self, fact: DependencyFact) {
        self.entries.entry(fact.name).or_default().push(fact.source);
    }

    /// Number of distinct dependency names recorded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take the settled state.
    pub fn snapshot(self) -> AggregateState {
        self.entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creates_then_appends() {
        let aggregator = ResultAggregator::new();
        aggregator.record("mtoa", Path::new("a.ma"));
        aggregator.record("mtoa", Path::new("b.ma"));
        aggregator.record("mtoa", Path::new("a.ma"));
        aggregator.record("maya", Path::new("a.ma"));

        assert_eq!(aggregator.len(), 2);
        let state = aggregator.snapshot();
        assert_eq!(
            state.files("mtoa").unwrap(),
            &[
                PathBuf::from("a.ma"),
                PathBuf::from("b.ma"),
                PathBuf::from("a.ma")
            ]
        );
        assert_eq!(state.count("maya"), 1);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let aggregator = ResultAggregator::new();
        aggregator.record("Mtoa", Path::new("a.ma"));
        aggregator.record("mtoa", Path::new("a.ma"));
        assert_eq!(aggregator.snapshot().len(), 2);
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let aggregator = ResultAggregator::new();
        let threads = 8;
        let per_thread = 500;

        std::thread::scope(|s| {
            for t in 0..threads {
                let aggregator = &aggregator;
                s.spawn(move || {
                    for i in 0..per_thread {
                        let name = format!("plugin{}", i % 7);
                        let path = PathBuf::from(format!("t{t}/f{i}.ma"));
                        aggregator.record_fact(DependencyFact::new(name, path));
                    }
                });
            }
        });

        let state = aggregator.snapshot();
        assert_eq!(state.len(), 7);
        assert_eq!(state.total_references(), threads * per_thread);
    }
}
