//! Core types and configuration for plugdeps.
//!
//! This crate provides the data model shared by the scanning and reporting
//! crates: dependency facts, the aggregate state they accumulate into,
//! scan configuration, and the error taxonomy.

mod config;
mod error;
mod fact;
mod stats;

pub use config::{DEFAULT_EXTENSION, ErrorPolicy, ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use error::{ExtractionFailure, ScanError};
pub use fact::{AggregateState, DependencyFact};
pub use stats::ScanStats;
