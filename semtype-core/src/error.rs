//! Error types for semtype-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for semtype-core operations.
pub type Result<T> = std::result::Result<T, SemtypeError>;

/// Fatal errors that abort a run.
///
/// Anything recoverable (a single declaration that cannot be rendered, a
/// corrupt state file) is absorbed by the component that hit it and reported
/// through [`crate::diagnostics::Diagnostics`] instead.
#[derive(Error, Debug)]
pub enum SemtypeError {
    /// The source directory does not exist or is not a directory.
    #[error("Source directory not found: {path}")]
    SourceDirNotFound {
        /// Directory that was requested.
        path: PathBuf,
    },

    /// Directory traversal failed.
    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Reading a source file or the state file failed.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A source file could not be parsed.
    #[error("Failed to parse {path}:{line}: {message}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// 1-indexed line of the first syntax error.
        line: u32,
        /// Description of the failure.
        message: String,
    },

    /// The tree-sitter grammar could not be loaded.
    #[error("Failed to set Go language: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The new state could not be written.
    #[error("Failed to write state file {path}: {source}")]
    StateWrite {
        /// State location.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The new state could not be serialized.
    #[error("Failed to encode state: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The recorded version cannot be bumped any further.
    #[error(transparent)]
    VersionOverflow(#[from] crate::version::VersionOverflow),

    /// An invalid scanner configuration (for example a bad ignore glob).
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },
}

impl SemtypeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SemtypeError::Io {
            path: path.into(),
            source,
        }
    }
}
