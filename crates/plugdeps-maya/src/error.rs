//! Decoder errors.

use thiserror::Error;

/// Errors produced while decoding a Maya ASCII file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying reader failed.
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    /// The first line is not a Maya ASCII header.
    #[error("missing '//Maya ASCII' header")]
    MissingHeader,

    /// A double-quoted string runs to end of input.
    #[error("unterminated string starting on line {line}")]
    UnterminatedString { line: usize },

    /// Input ends in the middle of a statement.
    #[error("unterminated statement starting on line {line}")]
    UnterminatedStatement { line: usize },

    /// A `requires` statement has no plugin name.
    #[error("requires statement on line {line} has no plugin name")]
    MissingPluginName { line: usize },

    /// A flag that takes a value was not followed by one.
    #[error("flag {flag} on line {line} is missing its value")]
    MissingFlagValue { flag: String, line: usize },
}

impl ParseError {
    /// Check if this error came from the reader rather than the content.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
