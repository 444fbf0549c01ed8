//! Custom error types for the CatShell application

use thiserror::Error;

/// Main error type for CatShell operations
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Auxiliary process failed to start: {0}")]
    AuxiliaryLaunch(String),

    #[error("Invalid input: {0}")]
    Input(String),
}

impl From<serde_json::Error> for ShellError {
    fn from(e: serde_json::Error) -> Self {
        ShellError::Serialization(e.to_string())
    }
}

/// Result type alias for CatShell operations
pub type ShellResult<T> = Result<T, ShellError>;
