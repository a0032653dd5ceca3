/// Health check and API info routes
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub users: &'static str,
    pub uploads: &'static str,
}

/// GET /health - Health check endpoint
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
        timestamp: Utc::now(),
        environment: app_state.environment.to_string(),
    })
}

/// GET / - API info
pub async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        success: true,
        message: "User API Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            health: "/health",
            users: "/api/users",
            uploads: "/uploads",
        },
    })
}
