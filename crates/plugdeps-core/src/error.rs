//! Error types for scanning operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// No root paths were given.
    #[error("No input paths given")]
    NoRoots,

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// A scene file could not be opened, read, or parsed.
    #[error("Failed to extract dependencies from {path}: {source}")]
    Extraction {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Some files failed under [`ErrorPolicy::Continue`](crate::ErrorPolicy::Continue).
    #[error("{count} file(s) failed to extract")]
    PartialFailure { count: usize },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Worker pool could not be started.
    #[error("Failed to start worker pool: {message}")]
    ThreadPool { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an extraction error wrapping the original cause.
    pub fn extraction(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Extraction {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Failure record for an extraction error, `None` for every other kind.
    pub fn as_failure(&self) -> Option<ExtractionFailure> {
        match self {
            Self::Extraction { path, source } => {
                Some(ExtractionFailure::new(path, source.to_string()))
            }
            _ => None,
        }
    }
}

/// A file that failed to extract while the run kept going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// File that failed.
    pub path: PathBuf,
    /// Human-readable cause.
    pub message: String,
}

impl ExtractionFailure {
    /// Create a new failure record.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));

        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_extraction_error_keeps_cause() {
        let cause = std::io::Error::other("disk on fire");
        let err = ScanError::extraction("/scenes/a.ma", cause);

        let message = err.to_string();
        assert!(message.contains("/scenes/a.ma"));
        assert!(message.contains("disk on fire"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_failure_from_extraction_error() {
        let err = ScanError::extraction("a.ma", std::io::Error::other("bad"));
        assert_eq!(err.as_failure(), Some(ExtractionFailure::new("a.ma", "bad")));
        assert!(ScanError::NoRoots.as_failure().is_none());
    }
}
