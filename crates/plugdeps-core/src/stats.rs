//! Scan statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Counters gathered while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Files yielded by the walker, matching or not.
    pub files_seen: u64,
    /// Files skipped for not matching the recognized extension.
    pub files_skipped: u64,
    /// Candidate files successfully extracted.
    pub files_processed: u64,
    /// Candidate files that failed to extract.
    pub files_failed: u64,
    /// Dependency facts recorded into the aggregate.
    pub facts_recorded: u64,
    /// Worker pool size.
    pub workers: usize,
    /// Wall-clock duration of the scan.
    pub duration: Duration,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file seen by the enumerator.
    pub fn record_seen(&mut self) {
        self.files_seen += 1;
    }

    /// Record a non-matching file.
    pub fn record_skip(&mut self) {
        self.files_skipped += 1;
    }

    /// Record a successfully extracted file and its fact count.
    pub fn record_processed(&mut self, facts: usize) {
        self.files_processed += 1;
        self.facts_recorded += facts as u64;
    }

    /// Record a failed extraction.
    pub fn record_failure(&mut self) {
        self.files_failed += 1;
    }

    /// Fold another set of counters into this one.
    pub fn merge(&mut self, other: &ScanStats) {
        self.files_seen += other.files_seen;
        self.files_skipped += other.files_skipped;
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
        self.facts_recorded += other.facts_recorded;
    }
}
