use crate::users;
use async_trait::async_trait;
use roster_core::{
    error::Result,
    types::{CreateUser, UpdateUser, User, UserId},
    UserRepository,
};
use sqlx::SqlitePool;

/// `SQLite`-backed user repository
///
/// Cloning is cheap; clones share the underlying pool. Each call acquires a
/// connection for the duration of one statement.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `database_url` and apply migrations
    pub async fn connect(database_url: &str) -> crate::Result<Self> {
        let pool = crate::create_pool(database_url).await?;
        crate::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: CreateUser) -> Result<User> {
        Ok(users::create(&self.pool, user).await?)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(users::get_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(users::get_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(users::find_by_email(&self.pool, email).await?)
    }

    async fn update(&self, id: UserId, user: UpdateUser) -> Result<Option<User>> {
        Ok(users::update(&self.pool, id, user).await?)
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>> {
        Ok(users::delete(&self.pool, id).await?)
    }

    async fn count(&self) -> Result<i64> {
        Ok(users::count(&self.pool).await?)
    }

    async fn clear(&self) -> Result<u64> {
        Ok(users::clear(&self.pool).await?)
    }
}
