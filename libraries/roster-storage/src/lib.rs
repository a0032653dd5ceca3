//! Roster Storage
//!
//! `SQLite` persistence for the user directory.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `users` owns its queries as free functions over a pool
//! - **Repository**: [`SqliteUserRepository`] implements the core `UserRepository`
//!   trait on top of those functions, so callers hold an injected handle instead
//!   of a global pool
//! - **Migrations**: embedded at compile time from `./migrations`
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_core::UserRepository;
//! use roster_storage::SqliteUserRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = SqliteUserRepository::connect("sqlite://roster.db").await?;
//! let users = repo.find_all().await?;
//! println!("{} users", users.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod repository;

pub mod seed;
pub mod users;

pub use error::{Result, StorageError};
pub use repository::SqliteUserRepository;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before serving requests.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://roster.db`,
///   or `sqlite::memory:` for a throwaway database)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    tracing::debug!(url = %database_url, in_memory, "Creating SQLite pool");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(30));

    // Every in-memory connection is a separate database, so keep exactly one
    // and never let it be recycled.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options = options.journal_mode(SqliteJournalMode::Wal);
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}
