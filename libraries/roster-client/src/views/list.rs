//! User list screen.

use crate::client::UserApi;
use crate::notification::Toast;
use roster_core::{User, UserId};
use std::sync::Arc;
use tracing::warn;

pub const LOAD_ERROR: &str = "Failed to load users";
pub const DELETE_ERROR: &str = "Failed to delete user. Please try again.";

/// Result of a delete action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation prompt
    Cancelled,
    /// The id is not in the current list
    Missing,
    Deleted,
    /// The server refused; the row was put back
    Failed,
}

/// The directory list: loaded users, load errors, and pending deletes.
pub struct UserListView {
    api: Arc<dyn UserApi>,
    users: Vec<User>,
    loading: bool,
    error: Option<String>,
    deleting: Option<UserId>,
    toasts: Vec<Toast>,
}

impl UserListView {
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        Self {
            api,
            users: Vec::new(),
            loading: false,
            error: None,
            deleting: None,
            toasts: Vec::new(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Id of the user whose delete request is in flight
    pub fn deleting(&self) -> Option<UserId> {
        self.deleting
    }

    /// Displayable avatar URL for a listed user
    pub fn avatar_url(&self, user: &User) -> Option<String> {
        user.avatar.as_deref().map(|avatar| self.api.avatar_url(avatar))
    }

    /// Drain pending notifications
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// Fetch the list. Failures leave the previous rows in place.
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        match self.api.list_users().await {
            Ok(users) => self.users = users,
            Err(e) => {
                warn!(error = %e, "Failed to load users");
                self.error = Some(LOAD_ERROR.to_string());
            }
        }

        self.loading = false;
    }

    /// Load again after a failure
    pub async fn retry(&mut self) {
        self.load().await;
    }

    /// Text of the confirmation prompt shown before deleting `user`
    pub fn confirm_message(user: &User) -> String {
        format!(
            "Are you sure you want to delete {}? This action cannot be undone.",
            user.full_name()
        )
    }

    /// Delete a listed user after confirmation.
    ///
    /// The row disappears before the request is sent and returns to its
    /// old position if the server call fails.
    pub async fn delete(&mut self, id: UserId, confirm: impl FnOnce(&str) -> bool) -> DeleteOutcome {
        let Some(index) = self.users.iter().position(|u| u.id == id) else {
            return DeleteOutcome::Missing;
        };

        if !confirm(&Self::confirm_message(&self.users[index])) {
            return DeleteOutcome::Cancelled;
        }

        let user = self.users.remove(index);
        self.deleting = Some(id);

        let outcome = match self.api.delete_user(id).await {
            Ok(_) => {
                self.toasts
                    .push(Toast::success(format!("{} deleted successfully!", user.full_name())));
                DeleteOutcome::Deleted
            }
            Err(e) => {
                warn!(id, error = %e, "Failed to delete user");
                let index = index.min(self.users.len());
                self.users.insert(index, user);
                self.toasts.push(Toast::error(DELETE_ERROR));
                DeleteOutcome::Failed
            }
        };

        self.deleting = None;
        outcome
    }
}
