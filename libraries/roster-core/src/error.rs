//! Error types for Roster

use crate::validation::ValidationErrors;
use thiserror::Error;

/// Result type alias using `RosterError`
pub type Result<T> = std::result::Result<T, RosterError>;

/// Errors shared by the repository, the server, and the tools built on them
#[derive(Error, Debug)]
pub enum RosterError {
    /// One or more fields failed validation
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store failed to execute a statement
    #[error("Database error: {0}")]
    Database(String),

    /// Storage setup or file handling failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RosterError {
    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}
