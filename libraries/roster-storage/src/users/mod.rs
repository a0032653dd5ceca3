//! User directory queries
//!
//! One statement per operation; the UNIQUE constraint on `email` is the only
//! guard against duplicates, so concurrent writers race at the store.

use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use roster_core::types::{CreateUser, UpdateUser, User, UserId};
use roster_core::validation::normalize_email;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    country: String,
    city: String,
    email: String,
    phone_number: Option<String>,
    avatar: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            country: row.country,
            city: row.city,
            email: row.email,
            phone_number: row.phone_number,
            avatar: row.avatar,
            created_at: from_millis(row.created_at)?,
            updated_at: from_millis(row.updated_at)?,
        })
    }
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StorageError::InvalidData(format!("timestamp out of range: {millis}")))
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn email_taken(email: &str) -> String {
    format!("email already in use: {email}")
}

/// Insert a user; `created_at` and `updated_at` get the same instant
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    let now = now_millis();
    let email = normalize_email(&user.email);

    let row: UserRow = sqlx::query_as(
        "INSERT INTO users (first_name, last_name, country, city, email, phone_number, avatar, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id, first_name, last_name, country, city, email, phone_number, avatar, created_at, updated_at",
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.country)
    .bind(&user.city)
    .bind(&email)
    .bind(&user.phone_number)
    .bind(&user.avatar)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| StorageError::from_write(e, email_taken(&email)))?;

    row.try_into()
}

/// Get all users, newest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows: Vec<UserRow> = sqlx::query_as(
        "SELECT id, first_name, last_name, country, city, email, phone_number, avatar, created_at, updated_at
         FROM users
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(User::try_from).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, first_name, last_name, country, city, email, phone_number, avatar, created_at, updated_at
         FROM users
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(User::try_from).transpose()
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, first_name, last_name, country, city, email, phone_number, avatar, created_at, updated_at
         FROM users
         WHERE email = ?",
    )
    .bind(normalize_email(email))
    .fetch_optional(pool)
    .await?;

    row.map(User::try_from).transpose()
}

/// Apply a partial update in one statement.
///
/// `updated_at` moves to now, or one millisecond past its previous value if
/// the clock has not advanced, so it always strictly increases.
pub async fn update(pool: &SqlitePool, id: UserId, user: UpdateUser) -> Result<Option<User>> {
    let email = user.email.as_deref().map(normalize_email);
    let (set_phone, phone_number) = match user.phone_number {
        Some(value) => (true, value),
        None => (false, None),
    };

    let row: Option<UserRow> = sqlx::query_as(
        "UPDATE users SET
             first_name = COALESCE(?, first_name),
             last_name = COALESCE(?, last_name),
             country = COALESCE(?, country),
             city = COALESCE(?, city),
             email = COALESCE(?, email),
             phone_number = CASE WHEN ? THEN ? ELSE phone_number END,
             avatar = COALESCE(?, avatar),
             updated_at = MAX(?, updated_at + 1)
         WHERE id = ?
         RETURNING id, first_name, last_name, country, city, email, phone_number, avatar, created_at, updated_at",
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.country)
    .bind(&user.city)
    .bind(&email)
    .bind(set_phone)
    .bind(&phone_number)
    .bind(&user.avatar)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::from_write(e, email_taken(email.as_deref().unwrap_or_default())))?;

    row.map(User::try_from).transpose()
}

/// Hard delete, returning the removed row
pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "DELETE FROM users
         WHERE id = ?
         RETURNING id, first_name, last_name, country, city, email, phone_number, avatar, created_at, updated_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(User::try_from).transpose()
}

pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete every user
pub async fn clear(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM users").execute(pool).await?;

    Ok(result.rows_affected())
}
