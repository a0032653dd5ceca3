//! Field-level rules for user payloads
//!
//! Create requires every mandatory field; update accepts any subset. Both
//! collect every violation instead of stopping at the first, so a form can
//! show all inline errors at once.

use crate::types::{CreateUser, UpdateUser, UserInput};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use validator::ValidateEmail;

/// Shortest accepted name/location value, in characters
pub const MIN_TEXT_LEN: usize = 2;

/// Longest accepted name/location value, in characters
pub const MAX_TEXT_LEN: usize = 100;

/// Upload ceiling for avatar images
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// User attributes that can carry a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    FirstName,
    LastName,
    Country,
    City,
    Email,
    PhoneNumber,
    Avatar,
}

impl Field {
    /// Wire name used in forms, JSON bodies, and error lists
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Country => "country",
            Field::City => "city",
            Field::Email => "email",
            Field::PhoneNumber => "phoneNumber",
            Field::Avatar => "avatar",
        }
    }

    /// Human label used in messages
    pub fn label(self) -> &'static str {
        match self {
            Field::Id => "User ID",
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Country => "Country",
            Field::City => "City",
            Field::Email => "Email",
            Field::PhoneNumber => "Phone number",
            Field::Avatar => "Avatar",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str().to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in a payload, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First message recorded for `field`, if any
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field.as_str())
            .map(|e| e.message.as_str())
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validation failed")?;
        for (i, error) in self.0.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { "; " })?;
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a create payload.
///
/// The returned `CreateUser` carries trimmed values and a lower-cased email.
/// `avatar` is left empty; the caller attaches an uploaded file afterwards.
pub fn validate_create(input: &UserInput) -> Result<CreateUser, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let first_name = required_text(Field::FirstName, input.first_name.as_deref(), &mut errors);
    let last_name = required_text(Field::LastName, input.last_name.as_deref(), &mut errors);
    let country = required_text(Field::Country, input.country.as_deref(), &mut errors);
    let city = required_text(Field::City, input.city.as_deref(), &mut errors);

    let email = match input.email.as_deref().map(str::trim) {
        Some(value) if is_valid_email(value) => Some(normalize_email(value)),
        _ => {
            errors.push(email_error());
            None
        }
    };

    let phone_number = match non_blank(input.phone_number.as_deref()) {
        None => None,
        Some(value) if is_valid_phone(value) => Some(value.to_string()),
        Some(_) => {
            errors.push(phone_error());
            None
        }
    };

    match (first_name, last_name, country, city, email) {
        (Some(first_name), Some(last_name), Some(country), Some(city), Some(email))
            if errors.is_empty() =>
        {
            Ok(CreateUser {
                first_name,
                last_name,
                country,
                city,
                email,
                phone_number,
                avatar: None,
            })
        }
        _ => Err(errors),
    }
}

/// Validate an update payload. Absent fields stay `None` (unchanged);
/// an empty phone number becomes an explicit clear.
pub fn validate_update(input: &UserInput) -> Result<UpdateUser, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let first_name = optional_text(Field::FirstName, input.first_name.as_deref(), &mut errors);
    let last_name = optional_text(Field::LastName, input.last_name.as_deref(), &mut errors);
    let country = optional_text(Field::Country, input.country.as_deref(), &mut errors);
    let city = optional_text(Field::City, input.city.as_deref(), &mut errors);

    let email = match input.email.as_deref().map(str::trim) {
        None => None,
        Some(value) if is_valid_email(value) => Some(normalize_email(value)),
        Some(_) => {
            errors.push(email_error());
            None
        }
    };

    let phone_number = match input.phone_number.as_deref().map(str::trim) {
        None => None,
        Some("") => Some(None),
        Some(value) if is_valid_phone(value) => Some(Some(value.to_string())),
        Some(_) => {
            errors.push(phone_error());
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UpdateUser {
        first_name,
        last_name,
        country,
        city,
        email,
        phone_number,
        avatar: None,
    })
}

/// Syntactic email check. A dotted domain is required, so `user@localhost`
/// is rejected.
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    value.to_owned().validate_email()
        && value
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'))
}

/// Lower-case and trim an email for storage and lookup
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Phone numbers: optional leading `+`, then digits with optional space, dash,
/// dot, or parenthesis separators, 7 to 15 digits in total.
pub fn is_valid_phone(value: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^\+?[0-9 ().\-]+$").unwrap_or_else(|e| panic!("invalid phone pattern: {e}"))
    });

    let value = value.trim();
    if !pattern.is_match(value) || value[1..].contains('+') {
        return false;
    }

    let digits = value.chars().filter(char::is_ascii_digit).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

/// Image formats accepted as avatars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageType {
    pub const ALL: [ImageType; 4] = [
        ImageType::Jpeg,
        ImageType::Png,
        ImageType::Gif,
        ImageType::Webp,
    ];

    /// Match a MIME type such as `image/png` (parameters are ignored)
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("image/jpg") {
            return Some(ImageType::Jpeg);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.mime().eq_ignore_ascii_case(essence))
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Gif => "image/gif",
            ImageType::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageType::Jpeg => "jpg",
            ImageType::Png => "png",
            ImageType::Gif => "gif",
            ImageType::Webp => "webp",
        }
    }
}

/// Upload rule violation for an unsupported file type
pub fn avatar_type_error() -> FieldError {
    FieldError::new(
        Field::Avatar,
        "Only image files (JPEG, PNG, GIF, WebP) are allowed",
    )
}

/// Upload rule violation for an oversized file
pub fn avatar_size_error() -> FieldError {
    FieldError::new(Field::Avatar, "File too large. Maximum size is 5MB")
}

/// Check an avatar's declared type and size before it is stored
pub fn check_avatar(mime: &str, size: usize) -> Result<ImageType, FieldError> {
    let image_type = ImageType::from_mime(mime).ok_or_else(avatar_type_error)?;
    if size > MAX_AVATAR_BYTES {
        return Err(avatar_size_error());
    }
    Ok(image_type)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_text(field: Field, value: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
    match non_blank(value) {
        None => {
            errors.push(FieldError::new(field, format!("{} is required", field.label())));
            None
        }
        Some(value) => checked_length(field, value, errors),
    }
}

fn optional_text(field: Field, value: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
    value
        .map(str::trim)
        .and_then(|value| checked_length(field, value, errors))
}

fn checked_length(field: Field, value: &str, errors: &mut ValidationErrors) -> Option<String> {
    let len = value.chars().count();
    if (MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&len) {
        Some(value.to_string())
    } else {
        errors.push(FieldError::new(
            field,
            format!(
                "{} must be between {MIN_TEXT_LEN} and {MAX_TEXT_LEN} characters",
                field.label()
            ),
        ));
        None
    }
}

fn email_error() -> FieldError {
    FieldError::new(Field::Email, "Please provide a valid email address")
}

fn phone_error() -> FieldError {
    FieldError::new(Field::PhoneNumber, "Please provide a valid phone number")
}
