//! Per-file dependency extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use plugdeps_core::DependencyFact;
use plugdeps_maya::ParseError;
use thiserror::Error;

/// Why a single file could not be turned into facts.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be opened.
    #[error("cannot open file: {0}")]
    Open(#[source] std::io::Error),

    /// The file could not be read to the end.
    #[error("cannot read file: {0}")]
    Read(#[source] std::io::Error),

    /// The content is not a well-formed scene.
    #[error("malformed scene: {0}")]
    Parse(#[source] ParseError),
}

impl From<ParseError> for ExtractError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(io) => Self::Read(io),
            other => Self::Parse(other),
        }
    }
}

/// Turns one candidate file into the dependency facts it declares.
///
/// Implementations are shared by every worker, so they must be `Sync`.
pub trait Extractor: Send + Sync {
    /// Extract every declaration in `path`. An empty list is a valid result.
    fn extract(&self, path: &Path) -> Result<Vec<DependencyFact>, ExtractError>;
}

impl<F> Extractor for F
where
    F: Fn(&Path) -> Result<Vec<DependencyFact>, ExtractError> + Send + Sync,
{
    fn extract(&self, path: &Path) -> Result<Vec<DependencyFact>, ExtractError> {
        self(path)
    }
}

/// Extractor for Maya ASCII files: one fact per `requires` statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyExtractor;

impl DependencyExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for DependencyExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<DependencyFact>, ExtractError> {
        // The handle is released when `reader` drops, on every return path.
        let file = File::open(path).map_err(ExtractError::Open)?;
        let reader = BufReader::new(file);
        let scene = plugdeps_maya::parse(reader)?;

        Ok(scene
            .requires
            .into_iter()
            .map(|require| DependencyFact::new(require.name, path))
            .collect())
    }
}
