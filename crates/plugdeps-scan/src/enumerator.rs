//! Recursive discovery of candidate scene files.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;
use jwalk::{DirEntryIter, Parallelism, WalkDir};
use tracing::{debug, info};

use plugdeps_core::{ScanConfig, ScanError, ScanStats};

/// Lazy, single-pass iterator over candidate files under a set of roots.
///
/// Directories are descended recursively in sorted order. Files that do not
/// end with the recognized suffix are logged and skipped. The first
/// traversal error, including a directory that cannot be listed, is yielded
/// once and ends the iteration.
pub struct PathEnumerator {
    roots: VecDeque<PathBuf>,
    current: Option<DirEntryIter<((), ())>>,
    config: ScanConfig,
    stats: ScanStats,
    done: bool,
}

impl PathEnumerator {
    /// Create an enumerator over the roots of `config`.
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            roots: config.roots.iter().cloned().collect(),
            current: None,
            config: config.clone(),
            stats: ScanStats::new(),
            done: false,
        }
    }

    /// Counters for files seen and skipped so far.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Push every candidate into `paths` until the walk ends, the pool
    /// aborts, or every receiver is gone. Blocks while the queue is full.
    ///
    /// On a traversal error the abort flag is raised before returning it.
    /// Dropping `paths` on return is what closes the queue.
    pub fn feed(mut self, paths: Sender<PathBuf>, abort: &AtomicBool) -> Result<ScanStats, ScanError> {
        while let Some(candidate) = self.next() {
            if abort.load(Ordering::Acquire) {
                debug!("enumeration stopped: pool aborted");
                break;
            }
            let path = match candidate {
                Ok(path) => path,
                Err(err) => {
                    abort.store(true, Ordering::Release);
                    return Err(err);
                }
            };
            if paths.send(path).is_err() {
                debug!("enumeration stopped: no workers left");
                break;
            }
        }
        Ok(self.stats)
    }

    /// Filter one file, counting it and logging a skip if it does not match.
    fn admit(&mut self, path: PathBuf) -> Option<PathBuf> {
        self.stats.record_seen();
        if self.config.matches(&path) {
            Some(path)
        } else {
            info!("skip {}", path.display());
            self.stats.record_skip();
            None
        }
    }

    /// Start the next root. Returns a file root directly; directories are
    /// handed to jwalk.
    fn open_root(&mut self, root: PathBuf) -> Result<Option<PathBuf>, ScanError> {
        let metadata = std::fs::metadata(&root).map_err(|e| ScanError::io(&root, e))?;
        if !metadata.is_dir() {
            return Ok(self.admit(root));
        }

        debug!("walking {}", root.display());
        let walker = WalkDir::new(&root)
            // Traversal stays on the producer thread; the worker pool owns the parallelism.
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(self.config.follow_symlinks);
        self.current = Some(walker.into_iter());
        Ok(None)
    }

    fn fail(&mut self, err: ScanError) -> Option<Result<PathBuf, ScanError>> {
        self.done = true;
        self.current = None;
        self.roots.clear();
        Some(Err(err))
    }
}

impl Iterator for PathEnumerator {
    type Item = Result<PathBuf, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some(walker) = self.current.as_mut() {
                match walker.next() {
                    Some(Ok(mut entry)) => {
                        // jwalk reports a failed read_dir on the directory entry itself.
                        if let Some(err) = entry.read_children_error.take() {
                            return self.fail(ScanError::Walk {
                                path: entry.path(),
                                message: err.to_string(),
                            });
                        }
                        let file_type = entry.file_type();
                        if file_type.is_dir() || entry.depth() == 0 {
                            continue;
                        }
                        let path = entry.path();
                        // An unfollowed link to a directory is not a file.
                        if file_type.is_symlink() && path.is_dir() {
                            debug!("not following directory link {}", path.display());
                            continue;
                        }
                        if let Some(path) = self.admit(path) {
                            return Some(Ok(path));
                        }
                        continue;
                    }
                    Some(Err(err)) => {
                        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                        return self.fail(ScanError::Walk {
                            path,
                            message: err.to_string(),
                        });
                    }
                    None => self.current = None,
                }
            }

            let root = self.roots.pop_front()?;
            match self.open_root(root) {
                Ok(Some(path)) => return Some(Ok(path)),
                Ok(None) => {}
                Err(err) => return self.fail(err),
            }
        }
    }
}
