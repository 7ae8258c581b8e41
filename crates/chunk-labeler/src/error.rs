//! Error types for the labeling pipeline

use std::path::Path;
use thiserror::Error;

/// Result type alias for labeling operations
pub type Result<T> = std::result::Result<T, Error>;

/// Labeling pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source or output table could not be read or written
    #[error("Table error for '{path}': {message}")]
    Table { path: String, message: String },

    /// Unsupported table file type
    #[error("Unsupported table format: {0}")]
    UnsupportedFormat(String),

    /// Source table shape does not match what the pipeline needs
    #[error("Data error: {0}")]
    Data(String),

    /// Labeling engine returned the wrong number of labels for a chunk
    #[error("Label count mismatch: expected {expected} labels, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },

    /// Labeling engine error
    #[error("Labeling error: {0}")]
    Labeling(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a table error for the given path
    pub fn table(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Table {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create a data error
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    /// Create a labeling error
    pub fn labeling(message: impl Into<String>) -> Self {
        Self::Labeling(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
