//! Error types for the `issuetrack` binary.

use std::path::PathBuf;

use issuetrack_lib::StoreError;
use thiserror::Error;

/// Errors raised while configuring or bootstrapping the server.
#[derive(Error, Debug)]
pub enum AppError {
    // === Configuration Errors ===
    /// Configuration value is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("Invalid config file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },

    // === Storage Errors ===
    #[error(transparent)]
    Store(#[from] StoreError),

    // === I/O Errors ===
    /// Socket or file system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}

/// Result type using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
