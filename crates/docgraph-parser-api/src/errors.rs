use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting a header file.
///
/// Only file-level failures are reported this way. Problems local to a
/// single declaration are recovered inside the parser and never surface
/// as an error.
#[derive(Error, Debug)]
pub enum ParserError {
    /// Failed to read file
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// File too large
    #[error("File {0} exceeds maximum size ({1} bytes)")]
    FileTooLarge(PathBuf, usize),

    /// The file could not be tokenized at all
    #[error("Lexical error in {0}:{1}: {2}")]
    Lexical(PathBuf, usize, String),

    /// Generic parsing error
    #[error("Parse error in {0}: {1}")]
    ParseError(PathBuf, String),
}

/// Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;
