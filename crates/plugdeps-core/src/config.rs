//! Scan configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::ScanError;

/// Extension of Maya ASCII scene files.
pub const DEFAULT_EXTENSION: &str = "ma";

/// What to do when a single file fails to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the whole run on the first failure. Nothing is reported.
    #[default]
    FailFast,
    /// Log the failure, keep scanning, and report what succeeded.
    Continue,
}

/// Configuration for a scan run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Files or directories to scan.
    pub roots: Vec<PathBuf>,

    /// Number of worker threads (0 = available parallelism - 1, at least 1).
    #[builder(default = "0")]
    #[serde(default)]
    pub workers: usize,

    /// Recognized scene-file extension, with or without the leading dot.
    #[builder(default = "DEFAULT_EXTENSION.to_string()")]
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Behavior on per-file extraction failures.
    #[builder(default)]
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Follow symbolic links to directories while walking.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.roots {
            Some(ref roots) if roots.is_empty() => {
                return Err("At least one root path is required".to_string());
            }
            Some(ref roots) => {
                if roots.iter().any(|r| r.as_os_str().is_empty()) {
                    return Err("Root path cannot be empty".to_string());
                }
            }
            None => return Err("Root path is required".to_string()),
        }
        if let Some(ref ext) = self.extension {
            let ext = ext.trim_start_matches('.');
            if ext.is_empty() || ext.contains(['/', '\\']) {
                return Err(format!("Invalid extension: {ext:?}"));
            }
        }
        Ok(())
    }
}

impl From<ScanConfigBuilderError> for ScanError {
    fn from(err: ScanConfigBuilderError) -> Self {
        ScanError::InvalidConfig {
            message: err.to_string(),
        }
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config for the given roots with default settings.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            workers: 0,
            extension: default_extension(),
            error_policy: ErrorPolicy::default(),
            follow_symlinks: false,
        }
    }

    /// Effective worker pool size.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .saturating_sub(1)
                .max(1),
            n => n,
        }
    }

    /// Capacity of the path queue between the enumerator and the workers.
    pub fn queue_capacity(&self) -> usize {
        self.worker_count()
    }

    /// Suffix a path must end with to be a candidate, e.g. `.ma`.
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension.trim_start_matches('.'))
    }

    /// Check if a path ends with the recognized suffix (case-sensitive).
    pub fn matches(&self, path: &Path) -> bool {
        path.as_os_str()
            .as_encoded_bytes()
            .ends_with(self.suffix().as_bytes())
    }
}
