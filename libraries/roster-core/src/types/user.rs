//! User domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned user identifier
pub type UserId = i64;

/// A user directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Auto-incremented by the store, never reused
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub city: String,
    /// Unique across all users, stored lower-cased
    pub email: String,
    pub phone_number: Option<String>,
    /// `/uploads/<file>` for uploaded images, or an absolute URL
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "First Last", as shown in list views and prompts
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Raw field values as submitted by a form or JSON body.
///
/// Nothing here has been checked yet; run it through
/// [`validate_create`](crate::validation::validate_create) or
/// [`validate_update`](crate::validation::validate_update).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl UserInput {
    /// Set a field by its wire name (`firstName`, `city`, ...).
    ///
    /// Returns `false` for names that are not user attributes.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "country" => &mut self.country,
            "city" => &mut self.city,
            "email" => &mut self.email,
            "phoneNumber" => &mut self.phone_number,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Validated data for creating a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub city: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the stored number
    pub phone_number: Option<Option<String>>,
    pub avatar: Option<String>,
}

impl UpdateUser {
    /// True when the update would not touch any column besides `updated_at`
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.country.is_none()
            && self.city.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.avatar.is_none()
    }
}
