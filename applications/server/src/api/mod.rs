/// API route modules
pub mod form;
pub mod health;
pub mod users;

use axum::{extract::OriginalUri, http::StatusCode, Json};
use roster_core::ApiResponse;

/// Fallback for unknown endpoints
pub async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure("Endpoint not found").with_path(uri.path())),
    )
}
