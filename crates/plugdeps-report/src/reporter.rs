//! Report output in the supported formats.

use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::Report;

/// Errors writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The destination could not be written.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `name, count,` / `,,path` lines.
    #[default]
    Text,
    /// Pretty-printed JSON of [`Report`].
    Json,
}

/// Writes reports in a fixed format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a reporter for the given format.
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format this reporter writes.
    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Write `report` to `out`.
    pub fn write<W: Write>(&self, report: &Report, mut out: W) -> Result<(), ReportError> {
        match self.format {
            ReportFormat::Text => report.write_text(out)?,
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut out, report)?;
                writeln!(out)?;
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Render `report` to a string.
    pub fn render(&self, report: &Report) -> Result<String, ReportError> {
        let mut buf = Vec::new();
        self.write(report, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugdeps_core::{AggregateState, DependencyFact, ExtractionFailure};

    fn sample() -> Report {
        let state: AggregateState = vec![DependencyFact::new("mtoa", "shot.ma")]
            .into_iter()
            .collect();
        Report::from_state(&state)
    }

    #[test]
    fn test_text_render() {
        let text = Reporter::new(ReportFormat::Text).render(&sample()).unwrap();
        assert_eq!(text, "mtoa, 1,\n,,shot.ma\n");
    }

    #[test]
    fn test_json_render() {
        let json = Reporter::new(ReportFormat::Json).render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["entries"][0]["name"], "mtoa");
        assert_eq!(value["entries"][0]["count"], 1);
        assert_eq!(value["entries"][0]["files"][0], "shot.ma");
        assert!(value.get("failures").is_none());
    }

    #[test]
    fn test_json_includes_failures() {
        let report = sample().with_failures(vec![ExtractionFailure::new("bad.ma", "malformed")]);
        let json = Reporter::new(ReportFormat::Json).render(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
