/// Shared application state
use crate::{config::Environment, services::AvatarStorage};
use roster_core::UserRepository;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub avatars: Arc<AvatarStorage>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        avatars: Arc<AvatarStorage>,
        environment: Environment,
    ) -> Self {
        Self {
            users,
            avatars,
            environment,
        }
    }
}
