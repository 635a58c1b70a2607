//! Deterministic report rendering for plugdeps.
//!
//! A [`Report`] is the sorted view of an [`AggregateState`]: one entry per
//! dependency name in ascending byte order, each with its reference count
//! and the referencing files in the order they were recorded.
//!
//! The text layout is a two-level CSV-like listing:
//!
//! ```text
//! bar, 2,
//! ,,a.ma
//! ,,a.ma
//! foo, 2,
//! ,,a.ma
//! ,,b.ma
//! ```
//!
//! ```rust
//! use plugdeps_core::{AggregateState, DependencyFact};
//! use plugdeps_report::Report;
//!
//! let state: AggregateState = vec![
//!     DependencyFact::new("foo", "a.ma"),
//!     DependencyFact::new("bar", "a.ma"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let text = Report::from_state(&state).to_text();
//! assert_eq!(text, "bar, 1,\n,,a.ma\nfoo, 1,\n,,a.ma\n");
//! ```

mod report;
mod reporter;

pub use report::{Report, ReportEntry};
pub use reporter::{ReportError, ReportFormat, Reporter};

// Re-export core types
pub use plugdeps_core::{AggregateState, ExtractionFailure};
