//! Roster Core
//!
//! Platform-agnostic types, validation rules, and the repository contract
//! shared by the Roster server, its storage layer, and the HTTP client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `CreateUser`, `UpdateUser`, `UserInput`, and the
//!   `ApiResponse` envelope shared by server and client
//! - **Validation**: field rules applied before any repository call
//! - **Repository**: the `UserRepository` trait implemented by storage backends
//! - **Errors**: `RosterError`, shared by every layer
//!
//! Nothing in here performs I/O; storage and transport live in their own crates.

pub mod error;
pub mod repository;
pub mod types;
pub mod validation;

pub use error::{Result, RosterError};
pub use repository::UserRepository;
pub use types::{ApiResponse, CreateUser, UpdateUser, User, UserId, UserInput};
pub use validation::{Field, FieldError, ImageType, ValidationErrors};
