//! Error types for CLI operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Campaign file not found
    #[error("Campaign file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// `init` target already exists
    #[error("Refusing to overwrite {} (use --force)", path.display())]
    OutputExists { path: PathBuf },

    /// Recipient sources could not be read
    #[error("Failed to load recipients: {message}")]
    Recipients { message: String },

    /// Batch refused by the controller
    #[error("Batch rejected: {message}")]
    BatchRejected { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn output_exists(path: &Path) -> Self {
        Self::OutputExists {
            path: path.to_path_buf(),
        }
    }

    pub fn recipients(message: impl Into<String>) -> Self {
        Self::Recipients {
            message: message.into(),
        }
    }

    pub fn batch_rejected(message: impl Into<String>) -> Self {
        Self::BatchRejected {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
