//! Error types for the Roster client.

use roster_core::FieldError;
use thiserror::Error;

/// Errors that can occur when talking to a Roster server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with an error envelope
    #[error("Server error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// IO error while reading an avatar file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ClientError {
    /// HTTP status of an error envelope
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Field-level errors reported by the server, if any
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ClientError::Api { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
