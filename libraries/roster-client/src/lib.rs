//! Roster Client
//!
//! HTTP client for the Roster user directory API, plus the state behind the
//! two directory screens (the user list and the create/edit profile form).
//!
//! # Features
//!
//! - **Client**: typed access to every `/api/users` route, envelope decoding,
//!   and avatar URL resolution
//! - **Forms**: profile submissions sent as multipart data with an optional
//!   avatar file
//! - **Views**: list and profile screen state with optimistic deletes,
//!   inline field errors, and toast notifications
//!
//! # Example
//!
//! ```ignore
//! use roster_client::{ClientConfig, RosterClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RosterClient::new(ClientConfig::new("http://localhost:3002"))?;
//!
//!     let health = client.health().await?;
//!     println!("{} ({})", health.message, health.environment);
//!
//!     for user in client.list_users().await? {
//!         println!("{} <{}>", user.full_name(), user.email);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod form;
mod notification;
pub mod views;

pub use client::{ClientConfig, HealthStatus, RosterClient, UserApi};
pub use error::{ClientError, Result};
pub use form::{AvatarFile, ProfileForm};
pub use notification::{Toast, ToastKind};
pub use views::{DeleteOutcome, ProfileMode, ProfileView, SubmitOutcome, UserListView};
