/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{
    types::ApiResponse,
    validation::{Field, FieldError, ValidationErrors},
    RosterError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Internal detail of a 500 response, attached as a response extension.
///
/// The body never contains it; `middleware::expose_error_detail` copies it
/// into the envelope when running in development mode.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Upload rejected: {0}")]
    Upload(FieldError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn user_not_found() -> Self {
        Self::NotFound("User not found".to_string())
    }
}

impl From<ValidationErrors> for ServerError {
    fn from(errors: ValidationErrors) -> Self {
        ServerError::Validation(errors)
    }
}

impl From<RosterError> for ServerError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::Validation(errors) => ServerError::Validation(errors),
            RosterError::Conflict(msg) => ServerError::Conflict(msg),
            RosterError::Database(msg) | RosterError::Storage(msg) => ServerError::Database(msg),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::failure("Validation failed").with_errors(errors.into_inner()),
            ),
            ServerError::Upload(error) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::failure("File upload failed").with_errors(vec![error]),
            ),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponse::failure(msg)),
            ServerError::Conflict(ref msg) => {
                tracing::info!("Rejected duplicate: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ApiResponse::failure("A user with this email already exists").with_errors(vec![
                        FieldError::new(Field::Email, "Email is already in use"),
                    ]),
                )
            }
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiResponse::failure(msg)),
            ServerError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiResponse::failure("Request body too large"),
            ),
            internal => {
                tracing::error!("Request failed: {}", internal);
                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::failure("Internal server error")),
                )
                    .into_response();
                response
                    .extensions_mut()
                    .insert(ErrorDetail(internal.to_string()));
                return response;
            }
        };

        (status, Json(body)).into_response()
    }
}
