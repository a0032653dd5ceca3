/// Storage-specific errors
use roster_core::RosterError;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// A UNIQUE constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored value could not be mapped back to a domain type
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Map a failed INSERT/UPDATE, turning unique violations into `Conflict`
    pub(crate) fn from_write(err: sqlx::Error, what: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict(what.into()),
            _ => Self::Database(err),
        }
    }
}

impl From<StorageError> for RosterError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(msg) => RosterError::Conflict(msg),
            StorageError::Migration(e) => RosterError::storage(e.to_string()),
            other => RosterError::database(other.to_string()),
        }
    }
}
