//! Error types for hotrun.

use std::path::PathBuf;

/// Result type alias for hotrun operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that can occur while resolving, watching or running a file.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The watched file's extension has no registry entry.
    #[error("Sorry, the '{extension}' extension isn't supported!")]
    UnsupportedExtension {
        /// Extension taken from the watched file name (may be empty)
        extension: String,
    },

    /// The extension is registered but none of its candidate paths exist.
    #[error("Sorry, no interpreter could be located for the '{extension}' extension!")]
    InterpreterNotFound {
        /// Extension that was looked up
        extension: String,
        /// Every candidate path that was probed, in order
        candidates: Vec<PathBuf>,
    },

    /// The path handed to the watcher is not an existing file.
    #[error("Please enter an existing file path: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The watched file could not be inspected while polling.
    #[error("Cannot access watched file {}: {source}", .path.display())]
    FileAccess {
        /// Watched file path
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// The interpreter process could not be started.
    #[error("Failed to start interpreter {}: {source}", .interpreter.display())]
    Spawn {
        /// Interpreter executable
        interpreter: PathBuf,
        /// Underlying spawn error
        source: std::io::Error,
    },

    /// Failed to load the interpreter registry from a source.
    #[error("Failed to load interpreter registry: {0}")]
    LoadError(String),

    /// Failed to deserialize the merged interpreter registry.
    #[error("Failed to deserialize interpreter registry: {0}")]
    DeserializationError(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("{0}")]
    Other(String),
}

impl WatchError {
    /// Whether this error is raised while resolving the interpreter, before
    /// the watch loop is entered.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedExtension { .. } | Self::InterpreterNotFound { .. }
        )
    }
}
