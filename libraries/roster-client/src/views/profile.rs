//! Create/edit profile screen.

use crate::client::UserApi;
use crate::form::{AvatarFile, ProfileForm};
use crate::notification::Toast;
use roster_core::{validation::validate_create, Field, FieldError, User, UserId};
use std::sync::Arc;
use tracing::warn;

pub const LOAD_ERROR: &str = "Failed to load user data";

/// Which screen the form is on, from the route parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    Create,
    Edit(UserId),
}

impl From<Option<UserId>> for ProfileMode {
    fn from(id: Option<UserId>) -> Self {
        id.map_or(ProfileMode::Create, ProfileMode::Edit)
    }
}

/// Result of a submit action
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent
    Invalid,
    /// New user stored; the caller should return to the list
    Created(User),
    Updated(User),
    /// The server rejected the request or could not be reached
    Failed,
}

impl SubmitOutcome {
    pub fn navigate_to_list(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_))
    }
}

/// Form state for creating or editing one user.
pub struct ProfileView {
    api: Arc<dyn UserApi>,
    mode: ProfileMode,
    form: ProfileForm,
    existing_avatar: Option<String>,
    errors: Vec<FieldError>,
    load_error: Option<String>,
    loading: bool,
    submitting: bool,
    toasts: Vec<Toast>,
}

impl ProfileView {
    pub fn new(api: Arc<dyn UserApi>, id: Option<UserId>) -> Self {
        Self {
            api,
            mode: id.into(),
            form: ProfileForm::default(),
            existing_avatar: None,
            errors: Vec::new(),
            load_error: None,
            loading: false,
            submitting: false,
            toasts: Vec::new(),
        }
    }

    pub fn mode(&self) -> ProfileMode {
        self.mode
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// All inline errors
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Inline error shown under `field`
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field.as_str())
            .map(|e| e.message.as_str())
    }

    /// Drain pending notifications
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// In edit mode, fetch the user and fill the form
    pub async fn load(&mut self) {
        let ProfileMode::Edit(id) = self.mode else {
            return;
        };

        self.loading = true;
        self.load_error = None;

        match self.api.get_user(id).await {
            Ok(user) => {
                self.form = ProfileForm::from_user(&user);
                self.existing_avatar = user.avatar;
            }
            Err(e) => {
                warn!(id, error = %e, "Failed to load user");
                self.load_error = Some(LOAD_ERROR.to_string());
            }
        }

        self.loading = false;
    }

    /// Change a text field, clearing its inline error
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if let Some(slot) = self.form.field_mut(field) {
            *slot = value.into();
            self.clear_error(field);
        }
    }

    fn clear_error(&mut self, field: Field) {
        self.errors.retain(|e| e.field != field.as_str());
    }

    /// Pick an avatar file. Files the server would refuse are rejected
    /// here with an inline error.
    pub fn choose_avatar(&mut self, file: AvatarFile) -> bool {
        self.clear_error(Field::Avatar);

        if let Err(error) = file.check() {
            self.errors.push(error);
            return false;
        }

        self.form.avatar = Some(file);
        true
    }

    pub fn clear_avatar(&mut self) {
        self.form.avatar = None;
        self.clear_error(Field::Avatar);
    }

    /// Image to show: the chosen file as a `data:` URL, else the stored avatar
    pub fn avatar_preview(&self) -> Option<String> {
        match &self.form.avatar {
            Some(file) => Some(file.data_url()),
            None => self
                .existing_avatar
                .as_deref()
                .map(|avatar| self.api.avatar_url(avatar)),
        }
    }

    /// Validate locally, then create or update.
    ///
    /// Field errors from the server replace the inline errors.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let avatar_error = self
            .errors
            .iter()
            .find(|e| e.field == Field::Avatar.as_str())
            .cloned();

        self.errors = match validate_create(&self.form.to_input()) {
            Ok(_) => Vec::new(),
            Err(errors) => errors.into_inner(),
        };
        self.errors.extend(avatar_error);

        if !self.errors.is_empty() {
            return SubmitOutcome::Invalid;
        }

        self.submitting = true;

        let result = match self.mode {
            ProfileMode::Create => self.api.create_user(&self.form).await,
            ProfileMode::Edit(id) => self.api.update_user(id, &self.form).await,
        };

        self.submitting = false;

        match (self.mode, result) {
            (ProfileMode::Create, Ok(user)) => {
                self.toasts.push(Toast::success("User created successfully!"));
                SubmitOutcome::Created(user)
            }
            (ProfileMode::Edit(_), Ok(user)) => {
                self.toasts.push(Toast::success("Profile updated successfully!"));
                self.form = ProfileForm::from_user(&user);
                self.existing_avatar.clone_from(&user.avatar);
                SubmitOutcome::Updated(user)
            }
            (mode, Err(e)) => {
                warn!(error = %e, "Failed to save profile");
                self.errors = e.field_errors().to_vec();
                let message = match mode {
                    ProfileMode::Create => "Failed to create profile. Please try again.",
                    ProfileMode::Edit(_) => "Failed to update profile. Please try again.",
                };
                self.toasts.push(Toast::error(message));
                SubmitOutcome::Failed
            }
        }
    }
}
