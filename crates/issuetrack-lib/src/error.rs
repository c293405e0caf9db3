//! Error types for `issuetrack-lib`.
//!
//! `StoreError` covers the datastore file; `IssueError` is what the
//! issue operations return to callers.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing the persisted datastore.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Datastore file does not exist.
    #[error("Datastore not found: {0}")]
    FileNotFound(PathBuf),

    /// Refused to overwrite an existing datastore.
    #[error("Datastore already exists: {0}")]
    AlreadyExists(PathBuf),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Content is not a valid serialized datastore.
    #[error("Datastore parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The blocking I/O task panicked or was cancelled.
    #[error("Storage task failed: {0}")]
    Task(String),
}

/// Primary error type for issue operations.
#[derive(Error, Debug)]
pub enum IssueError {
    // === Validation Errors ===
    /// One of `issue_title`, `issue_text`, `created_by` is absent or empty.
    #[error("required field(s) missing")]
    MissingRequiredFields,

    /// Update or delete without an `_id`.
    #[error("missing _id")]
    MissingId,

    /// Update carrying nothing but the `_id`.
    #[error("no update field(s) sent")]
    NoUpdateFields { id: String },

    // === Lookup Errors ===
    /// Update target not present in the project.
    #[error("could not update")]
    CouldNotUpdate { id: String },

    /// Delete target not present in the project.
    #[error("could not delete")]
    CouldNotDelete { id: String },

    // === Storage Errors ===
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IssueError {
    /// The issue id the error refers to, when the caller supplied one.
    #[must_use]
    pub fn issue_id(&self) -> Option<&str> {
        match self {
            Self::NoUpdateFields { id }
            | Self::CouldNotUpdate { id }
            | Self::CouldNotDelete { id } => Some(id),
            Self::MissingRequiredFields | Self::MissingId | Self::Store(_) => None,
        }
    }

    /// True for errors caused by the request content rather than by state.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredFields | Self::MissingId | Self::NoUpdateFields { .. }
        )
    }

    /// True when the referenced issue does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::CouldNotUpdate { .. } | Self::CouldNotDelete { .. })
    }
}

/// Result type using `IssueError`.
pub type Result<T> = std::result::Result<T, IssueError>;
