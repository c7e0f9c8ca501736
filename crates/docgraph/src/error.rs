//! Error types for docgraph operations.
//!
//! Only failures at the boundary of a run are errors: configuration, tree
//! providers, history ordering and export. Problems inside a single
//! declaration or file are logged and collected as diagnostics instead.

use docgraph_parser_api::ParserError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docgraph operations.
pub type Result<T> = std::result::Result<T, DocError>;

/// Error type for all docgraph operations.
#[derive(Error, Debug)]
pub enum DocError {
    /// Invalid project or parser configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// A tree provider has no headers for this version
    #[error("Version not found: {version}")]
    VersionNotFound {
        /// Requested version identifier
        version: String,
    },

    /// A tree provider failed while producing a version's headers
    #[error("Tree provider error for {version}: {message}")]
    Provider {
        /// Version being read
        version: String,
        /// Error details
        message: String,
    },

    /// History was fed a version that is not the next one in chronological order
    #[error("Out of order: expected version {expected}, got {got}")]
    OutOfOrder {
        /// The next version the history expects
        expected: String,
        /// The version that was offered
        got: String,
    },

    /// Version identifier that is not part of the version order
    #[error("Unknown version: {version}")]
    UnknownVersion {
        /// The unrecognized version identifier
        version: String,
    },

    /// A header front end failed on a whole file
    #[error(transparent)]
    Parser(#[from] ParserError),

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl DocError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a tree provider error.
    pub fn provider(version: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            version: version.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
