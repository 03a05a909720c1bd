//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for qtlint operations
#[derive(Debug, Error)]
pub enum Error {
    /// A suggested fix could not be applied to the source text
    #[error("Fix error in {file}: {message}")]
    Fix { file: PathBuf, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a fix application error for a file
    pub fn fix(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Fix {
            file: file.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
