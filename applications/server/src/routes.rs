/// Router assembly
use crate::{api, middleware, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Maximum size of a whole request body
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Uploaded avatars never change under a given name
const UPLOAD_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Build the application router.
///
/// Origins that are not valid header values are skipped; `ServerConfig::validate`
/// rejects them before this point.
pub fn create_router(app_state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let uploads = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(UPLOAD_CACHE_CONTROL),
        ))
        .service(ServeDir::new(app_state.avatars.base_path()));

    let user_routes = Router::new()
        .route(
            "/users",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route(
            "/users/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        );

    let mut router = Router::new()
        .route("/", get(api::health::info))
        .route("/health", get(api::health::health))
        .nest("/api", user_routes)
        .nest_service("/uploads", uploads)
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum_middleware::from_fn(middleware::security_headers));

    if app_state.environment.is_development() {
        router = router.layer(axum_middleware::from_fn(middleware::expose_error_detail));
    }

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(cors)
        .with_state(app_state)
}
