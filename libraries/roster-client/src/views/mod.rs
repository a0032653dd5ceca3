//! Screen state for the directory UI.
//!
//! Views own no rendering; they hold what a screen shows and run the API
//! calls behind its actions.

mod list;
mod profile;

pub use list::{DeleteOutcome, UserListView};
pub use profile::{ProfileMode, ProfileView, SubmitOutcome};
