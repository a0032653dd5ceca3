/// Development-only error detail for 500 responses
use crate::error::ErrorDetail;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::ApiResponse;

/// Rewrites 500 envelopes to include the internal error text.
///
/// Only layered onto the router in development mode; production responses
/// keep the generic message.
pub async fn expose_error_detail(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if response.status() != StatusCode::INTERNAL_SERVER_ERROR {
        return response;
    }

    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);

    let body = Json(ApiResponse::<()>::failure("Internal server error").with_error_detail(detail));
    (parts, body).into_response()
}
