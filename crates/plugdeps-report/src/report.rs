//! Sorted report model.

use std::io::{self, Write};
use std::path::PathBuf;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use plugdeps_core::{AggregateState, ExtractionFailure};

/// One dependency and every file that references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Dependency name.
    pub name: CompactString,
    /// Number of references (equals `files.len()`).
    pub count: usize,
    /// Referencing files in recorded order, duplicates included.
    pub files: Vec<PathBuf>,
}

/// Results of a scan, sorted by dependency name ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Entries in ascending name order.
    pub entries: Vec<ReportEntry>,

    /// Files that failed to extract when the run kept going.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ExtractionFailure>,
}

impl Report {
    /// Build a report from a settled aggregate.
    pub fn from_state(state: &AggregateState) -> Self {
        let entries = state
            .sorted()
            .into_iter()
            .map(|(name, files)| ReportEntry {
                name: name.into(),
                count: files.len(),
                files: files.to_vec(),
            })
            .collect();

        Self {
            entries,
            failures: Vec::new(),
        }
    }

    /// Attach tolerated extraction failures.
    pub fn with_failures(mut self, failures: Vec<ExtractionFailure>) -> Self {
        self.failures = failures;
        self
    }

    /// Check if no dependencies were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every entry's count.
    pub fn total_references(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Look up an entry by name.
    pub fn entry(&self, name: &str) -> Option<&ReportEntry> {
        self.entries
            .binary_search_by(|e| e.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Write the text layout: `name, count,` then one `,,path` line per file.
    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(out, "{}, {},", entry.name, entry.count)?;
            for file in &entry.files {
                writeln!(out, ",,{}", file.display())?;
            }
        }
        out.flush()
    }

    /// Render the text layout to a string.
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_text(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
