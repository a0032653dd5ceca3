//! Roster Server Library
//!
//! REST backend for the user directory: CRUD routes over the user
//! repository, avatar uploads, and static serving of uploaded images.
//!
//! This library exposes the router and its parts so integration tests can
//! drive the full stack without binding a socket.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{Environment, ServerConfig};
pub use error::{Result, ServerError};
pub use routes::create_router;
pub use services::avatar_storage::AvatarStorage;
pub use state::AppState;
