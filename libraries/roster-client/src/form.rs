//! Profile form data and avatar files.

use crate::error::{ClientError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::multipart::{Form, Part};
use roster_core::{
    validation::{check_avatar, FieldError},
    Field, User, UserInput,
};
use std::path::Path;

/// An image picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl AvatarFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read an image from disk, guessing its type from the extension
    pub async fn from_path(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("avatar")
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Self {
            file_name,
            content_type,
            data,
        })
    }

    /// Apply the server's type and size rules before uploading
    pub fn check(&self) -> std::result::Result<(), FieldError> {
        check_avatar(&self.content_type, self.data.len()).map(|_| ())
    }

    /// `data:` URL for previewing the image before upload
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }
}

/// Editable profile fields as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub city: String,
    pub email: String,
    pub phone_number: String,
    pub avatar: Option<AvatarFile>,
}

impl ProfileForm {
    /// Pre-fill the form from a stored user
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            country: user.country.clone(),
            city: user.city.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            avatar: None,
        }
    }

    /// Mutable access to a text field
    ///
    /// Returns `None` for fields that are not free text (`id`, `avatar`).
    pub fn field_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::FirstName => Some(&mut self.first_name),
            Field::LastName => Some(&mut self.last_name),
            Field::Country => Some(&mut self.country),
            Field::City => Some(&mut self.city),
            Field::Email => Some(&mut self.email),
            Field::PhoneNumber => Some(&mut self.phone_number),
            Field::Id | Field::Avatar => None,
        }
    }

    fn text_fields(&self) -> [(Field, &str); 6] {
        [
            (Field::FirstName, self.first_name.as_str()),
            (Field::LastName, self.last_name.as_str()),
            (Field::Country, self.country.as_str()),
            (Field::City, self.city.as_str()),
            (Field::Email, self.email.as_str()),
            (Field::PhoneNumber, self.phone_number.as_str()),
        ]
    }

    /// Every text field as submitted input, for client-side validation
    pub fn to_input(&self) -> UserInput {
        let mut input = UserInput::default();
        for (field, value) in self.text_fields() {
            input.set(field.as_str(), value.to_string());
        }
        input
    }

    /// Multipart body with the non-empty fields and the chosen file
    pub fn to_multipart(&self) -> Result<Form> {
        self.multipart(false)
    }

    /// Like [`to_multipart`](Self::to_multipart), but `phoneNumber` is always
    /// sent so an emptied field clears the stored number.
    pub fn to_update_multipart(&self) -> Result<Form> {
        self.multipart(true)
    }

    fn multipart(&self, keep_phone: bool) -> Result<Form> {
        let mut form = Form::new();

        for (field, value) in self.text_fields() {
            let value = value.trim();
            if !value.is_empty() || (keep_phone && field == Field::PhoneNumber) {
                form = form.text(field.as_str(), value.to_string());
            }
        }

        if let Some(avatar) = &self.avatar {
            let part = Part::bytes(avatar.data.clone())
                .file_name(avatar.file_name.clone())
                .mime_str(&avatar.content_type)
                .map_err(ClientError::Request)?;
            form = form.part(Field::Avatar.as_str(), part);
        }

        Ok(form)
    }
}
