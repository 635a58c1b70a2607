//! Concurrent scan-and-aggregate engine for plugdeps.
//!
//! # Overview
//!
//! A scan has four moving parts:
//!
//! - [`PathEnumerator`] walks every root with jwalk and feeds candidate
//!   scene files into a bounded queue
//! - [`WorkerPool`] drains the queue on a dedicated rayon pool
//! - each worker runs an [`Extractor`] on its file and pushes the resulting
//!   facts into the shared [`ResultAggregator`]
//! - the [`Scanner`] waits until the queue is closed and every worker has
//!   exited, then takes the settled [`AggregateState`]
//!
//! # Example
//!
//! ```rust,no_run
//! use plugdeps_scan::{ScanConfig, Scanner};
//!
//! let config = ScanConfig::new(["/projects/show/scenes"]);
//! let outcome = Scanner::new().scan(&config).unwrap();
//!
//! for (name, files) in outcome.state.sorted() {
//!     println!("{name}: {} file(s)", files.len());
//! }
//! ```

mod aggregator;
mod enumerator;
mod extractor;
mod pool;
mod scanner;

pub use aggregator::ResultAggregator;
pub use enumerator::PathEnumerator;
pub use extractor::{DependencyExtractor, ExtractError, Extractor};
pub use pool::{WorkerContext, WorkerPool, WorkerReport};
pub use scanner::{ScanOutcome, Scanner};

// Re-export core types for convenience
pub use plugdeps_core::{
    AggregateState, DependencyFact, ErrorPolicy, ExtractionFailure, ScanConfig, ScanError,
    ScanStats,
};
