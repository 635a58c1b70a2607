//! Scan coordinator: enumerator, worker pool, and completion barrier.

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use tracing::{debug, info};

use plugdeps_core::{AggregateState, ExtractionFailure, ScanConfig, ScanError, ScanStats};

use crate::aggregator::ResultAggregator;
use crate::enumerator::PathEnumerator;
use crate::extractor::{DependencyExtractor, Extractor};
use crate::pool::{WorkerContext, WorkerPool};

/// Settled result of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Dependency name to referencing files.
    pub state: AggregateState,
    /// Merged counters from the enumerator and every worker.
    pub stats: ScanStats,
    /// Files that failed under [`ErrorPolicy::Continue`](plugdeps_core::ErrorPolicy::Continue).
    pub failures: Vec<ExtractionFailure>,
}

impl ScanOutcome {
    /// Check if every candidate file was extracted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the full scan-and-aggregate pipeline.
pub struct Scanner<E = DependencyExtractor> {
    extractor: E,
}

impl Scanner {
    /// Create a scanner for Maya ASCII files.
    pub fn new() -> Self {
        Self {
            extractor: DependencyExtractor::new(),
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Extractor> Scanner<E> {
    /// Create a scanner with a custom extractor.
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    /// Scan every root in `config`.
    ///
    /// Roots are checked for existence before any work starts. Under
    /// [`ErrorPolicy::FailFast`](plugdeps_core::ErrorPolicy::FailFast) the
    /// first traversal or extraction error is returned and nothing that was
    /// aggregated survives. Traversal errors are fatal under every policy.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
        let start = Instant::now();

        if config.roots.is_empty() {
            return Err(ScanError::NoRoots);
        }
        for root in &config.roots {
            std::fs::metadata(root).map_err(|e| ScanError::io(root, e))?;
        }

        let pool = WorkerPool::from_config(config)?;
        let aggregator = ResultAggregator::new();
        let abort = AtomicBool::new(false);
        let ctx = WorkerContext {
            config,
            extractor: &self.extractor,
            aggregator: &aggregator,
            abort: &abort,
        };

        info!(
            roots = config.roots.len(),
            workers = pool.size(),
            policy = ?config.error_policy,
            "scanning"
        );

        let enumerator = PathEnumerator::new(config);
        let (produced, reports) = pool.run(&ctx, |paths| enumerator.feed(paths, &abort));

        // Every worker has exited; nothing writes to the aggregator past this point.
        let mut stats = ScanStats::new();
        let mut failures: Vec<ExtractionFailure> = Vec::new();
        let mut first_error = None;
        for report in reports {
            debug!(worker = report.id, ?report.stats, "worker report");
            stats.merge(&report.stats);
            failures.extend(report.failures);
            if let Some(err) = report.error {
                first_error.get_or_insert(err);
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }
        stats.merge(&produced?);
        stats.workers = pool.size();
        stats.duration = start.elapsed();

        let state = aggregator.snapshot();
        info!(
            files = stats.files_processed,
            skipped = stats.files_skipped,
            failed = stats.files_failed,
            dependencies = state.len(),
            references = stats.facts_recorded,
            elapsed_ms = stats.duration.as_millis() as u64,
            "scan complete"
        );

        failures.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(ScanOutcome {
            state,
            stats,
            failures,
        })
    }
}
