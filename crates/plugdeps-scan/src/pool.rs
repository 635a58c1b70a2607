//! Fixed-size worker pool draining the candidate queue.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, info, warn};

use plugdeps_core::{ErrorPolicy, ExtractionFailure, ScanConfig, ScanError, ScanStats};

use crate::aggregator::ResultAggregator;
use crate::extractor::Extractor;

/// Everything a worker borrows for the duration of a run.
pub struct WorkerContext<'a, E: ?Sized> {
    /// Scan configuration (suffix filter, error policy).
    pub config: &'a ScanConfig,
    /// Extractor shared by every worker.
    pub extractor: &'a E,
    /// Destination for extracted facts.
    pub aggregator: &'a ResultAggregator,
    /// Raised by whichever side hits a fatal error first.
    pub abort: &'a AtomicBool,
}

/// What one worker did before it exited.
#[derive(Debug, Default)]
pub struct WorkerReport {
    /// Worker index within the pool.
    pub id: usize,
    /// Files skipped, processed, and failed by this worker.
    pub stats: ScanStats,
    /// Failures tolerated under [`ErrorPolicy::Continue`].
    pub failures: Vec<ExtractionFailure>,
    /// The fatal error that stopped this worker, if any.
    pub error: Option<ScanError>,
}

/// A dedicated pool of `size` threads, one draining loop per thread.
pub struct WorkerPool {
    pool: ThreadPool,
    size: usize,
    queue_capacity: usize,
}

impl WorkerPool {
    /// Build a pool with `size` workers and a queue bounded at `queue_capacity`.
    pub fn new(size: usize, queue_capacity: usize) -> Result<Self, ScanError> {
        let size = size.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("plugdeps-worker-{i}"))
            .build()
            .map_err(|e| ScanError::ThreadPool {
                message: e.to_string(),
            })?;

        Ok(Self {
            pool,
            size,
            queue_capacity: queue_capacity.max(1),
        })
    }

    /// Build a pool sized from `config`.
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        Self::new(config.worker_count(), config.queue_capacity())
    }

    /// Number of workers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `produce` on the calling thread while the workers drain what it
    /// sends.
    ///
    /// Returns only after `produce` has returned (dropping its sender closes
    /// the queue) and every worker has observed the closure and exited.
    /// Worker reports are returned in the order the workers finished.
    pub fn run<E, F, R>(&self, ctx: &WorkerContext<'_, E>, produce: F) -> (R, Vec<WorkerReport>)
    where
        E: Extractor + ?Sized,
        F: FnOnce(Sender<PathBuf>) -> R,
    {
        let (path_tx, path_rx) = bounded::<PathBuf>(self.queue_capacity);
        let (done_tx, done_rx) = unbounded::<WorkerReport>();

        let produced = self.pool.in_place_scope(|scope| {
            for id in 0..self.size {
                let worker = Worker {
                    id,
                    ctx,
                    paths: path_rx.clone(),
                };
                let done_tx = done_tx.clone();
                scope.spawn(move |_| {
                    // The coordinator holds the receiver until after the scope.
                    let _ = done_tx.send(worker.run());
                });
            }
            // Workers hold the only receivers, so a dead pool unblocks the producer.
            drop(path_rx);
            produce(path_tx)
        });

        drop(done_tx);
        (produced, done_rx.try_iter().collect())
    }
}

struct Worker<'a, 'c, E: ?Sized> {
    id: usize,
    ctx: &'c WorkerContext<'a, E>,
    paths: Receiver<PathBuf>,
}

impl<E: Extractor + ?Sized> Worker<'_, '_, E> {
    fn run(self) -> WorkerReport {
        let WorkerContext {
            config,
            extractor,
            aggregator,
            abort,
        } = *self.ctx;
        let mut report = WorkerReport {
            id: self.id,
            ..WorkerReport::default()
        };

        for path in self.paths.iter() {
            if abort.load(Ordering::Acquire) {
                break;
            }

            if !config.matches(&path) {
                info!("skip {}", path.display());
                report.stats.record_skip();
                continue;
            }

            debug!(worker = self.id, "check {}", path.display());
            match extractor.extract(&path) {
                Ok(facts) => {
                    let count = facts.len();
                    for fact in facts {
                        aggregator.record_fact(fact);
                    }
                    report.stats.record_processed(count);
                }
                Err(err) => {
                    report.stats.record_failure();
                    let err = ScanError::extraction(path, err);
                    match config.error_policy {
                        ErrorPolicy::FailFast => {
                            error!(worker = self.id, "{err}");
                            abort.store(true, Ordering::Release);
                            report.error = Some(err);
                            break;
                        }
                        ErrorPolicy::Continue => {
                            warn!(worker = self.id, "{err}");
                            report.failures.extend(err.as_failure());
                        }
                    }
                }
            }
        }

        debug!(worker = self.id, processed = report.stats.files_processed, "worker done");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;

    use plugdeps_core::DependencyFact;

    use crate::extractor::ExtractError;

    fn one_fact(path: &Path) -> Result<Vec<DependencyFact>, ExtractError> {
        Ok(vec![DependencyFact::new("mtoa", path)])
    }

    #[test]
    fn test_every_path_processed_once() {
        let config = ScanConfig::new(["."]);
        let aggregator = ResultAggregator::new();
        let abort = AtomicBool::new(false);
        let ctx = WorkerContext {
            config: &config,
            extractor: &one_fact,
            aggregator: &aggregator,
            abort: &abort,
        };

        let pool = WorkerPool::new(4, 4).unwrap();
        let (sent, reports) = pool.run(&ctx, |tx| {
            for i in 0..200 {
                tx.send(PathBuf::from(format!("f{i}.ma"))).unwrap();
            }
            200
        });

        assert_eq!(sent, 200);
        assert_eq!(reports.len(), 4);
        let processed: u64 = reports.iter().map(|r| r.stats.files_processed).sum();
        assert_eq!(processed, 200);
        assert_eq!(aggregator.snapshot().count("mtoa"), 200);
    }

    #[test]
    fn test_workers_skip_non_matching() {
        let config = ScanConfig::new(["."]);
        let aggregator = ResultAggregator::new();
        let abort = AtomicBool::new(false);
        let ctx = WorkerContext {
            config: &config,
            extractor: &one_fact,
            aggregator: &aggregator,
            abort: &abort,
        };

        let pool = WorkerPool::new(2, 2).unwrap();
        let (_, reports) = pool.run(&ctx, |tx| {
            tx.send(PathBuf::from("notes.txt")).unwrap();
            tx.send(PathBuf::from("a.ma")).unwrap();
        });

        let skipped: u64 = reports.iter().map(|r| r.stats.files_skipped).sum();
        assert_eq!(skipped, 1);
        let state = aggregator.snapshot();
        assert!(!state.references(Path::new("notes.txt")));
        assert_eq!(state.total_references(), 1);
    }

    #[test]
    fn test_fail_fast_raises_abort() {
        let config = ScanConfig::new(["."]);
        let aggregator = ResultAggregator::new();
        let abort = AtomicBool::new(false);
        let failing = |path: &Path| -> Result<Vec<DependencyFact>, ExtractError> {
            if path == Path::new("bad.ma") {
                Err(ExtractError::Open(std::io::Error::other("boom")))
            } else {
                Ok(Vec::new())
            }
        };
        let ctx = WorkerContext {
            config: &config,
            extractor: &failing,
            aggregator: &aggregator,
            abort: &abort,
        };

        let pool = WorkerPool::new(2, 2).unwrap();
        let (_, reports) = pool.run(&ctx, |tx| {
            tx.send(PathBuf::from("bad.ma")).unwrap();
            // Keep producing until the pool notices.
            for i in 0..10_000 {
                if abort.load(Ordering::Acquire) || tx.send(PathBuf::from(format!("{i}.ma"))).is_err() {
                    break;
                }
            }
        });

        assert!(abort.load(Ordering::Acquire));
        let errors: Vec<_> = reports.iter().filter_map(|r| r.error.as_ref()).collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ScanError::Extraction { .. }));
    }

    #[test]
    fn test_continue_collects_failures() {
        let mut config = ScanConfig::new(["."]);
        config.error_policy = ErrorPolicy::Continue;
        let aggregator = ResultAggregator::new();
        let abort = AtomicBool::new(false);
        let calls = AtomicUsize::new(0);
        let flaky = |path: &Path| -> Result<Vec<DependencyFact>, ExtractError> {
            calls.fetch_add(1, Ordering::Relaxed);
            if path.to_string_lossy().starts_with("bad") {
                Err(ExtractError::Open(std::io::Error::other("boom")))
            } else {
                Ok(vec![DependencyFact::new("ok", path)])
            }
        };
        let ctx = WorkerContext {
            config: &config,
            extractor: &flaky,
            aggregator: &aggregator,
            abort: &abort,
        };

        let pool = WorkerPool::new(3, 3).unwrap();
        pool.run(&ctx, |tx| {
            for name in ["bad1.ma", "good1.ma", "bad2.ma", "good2.ma"] {
                tx.send(PathBuf::from(name)).unwrap();
            }
        });

        assert!(!abort.load(Ordering::Acquire));
        assert_eq!(calls.load(Ordering::Relaxed), 4);
        assert_eq!(aggregator.snapshot().count("ok"), 2);
    }
}
