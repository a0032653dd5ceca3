//! Repository contract for user persistence

use crate::error::Result;
use crate::types::{CreateUser, UpdateUser, User, UserId};
use async_trait::async_trait;

/// CRUD access to the user store.
///
/// Every operation maps to a single statement. Lookups, updates, and deletes
/// against a missing id yield `Ok(None)` rather than an error; callers decide
/// whether that is a not-found condition.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// Fails with [`RosterError::Conflict`](crate::RosterError::Conflict) when
    /// the email is already taken.
    async fn create(&self, user: CreateUser) -> Result<User>;

    /// All users, newest first
    async fn find_all(&self) -> Result<Vec<User>>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Look up by email (normalized before comparison)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Apply a partial update, refreshing `updated_at`
    async fn update(&self, id: UserId, user: UpdateUser) -> Result<Option<User>>;

    /// Hard delete, returning the removed row
    async fn delete(&self, id: UserId) -> Result<Option<User>>;

    /// Number of stored users
    async fn count(&self) -> Result<i64>;

    /// Remove every user, returning how many rows were deleted
    async fn clear(&self) -> Result<u64>;
}
