//! User accounts
//!
//! Users are administrators or operators. They are created and modified only
//! by administrators and are deactivated rather than removed in normal use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::validation::{validate_max_length, validate_name, MAX_PHONE_LENGTH};
use crate::service::error::AccessControlResult;
use crate::types::{Role, UserId};

/// A user of the access control system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: UserId,
    /// Unique login name
    pub username: String,
    /// Contact email
    pub email: Option<String>,
    /// Role deciding which operations the user may perform
    pub role: Role,
    /// Contact phone number
    pub phone: Option<String>,
    /// Inactive users cannot act
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the user holds the administrator role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Input for creating a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Unique login name
    pub username: String,
    /// Contact email
    pub email: Option<String>,
    /// Role (defaults to operator)
    #[serde(default)]
    pub role: Role,
    /// Contact phone number
    pub phone: Option<String>,
}

impl NewUser {
    /// Create input for a user with the given username and role
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), role, ..Default::default() }
    }

    /// Validate field contents
    pub fn validate(&self) -> AccessControlResult<()> {
        validate_name("username", &self.username)?;
        validate_max_length("phone", self.phone.as_deref(), MAX_PHONE_LENGTH)
    }

    pub(crate) fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: UserId::new(),
            username: self.username.trim().to_string(),
            email: self.email,
            role: self.role,
            phone: self.phone,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a user; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New login name
    pub username: Option<String>,
    /// New email (`Some(None)` clears it)
    pub email: Option<Option<String>>,
    /// New role
    pub role: Option<Role>,
    /// New phone (`Some(None)` clears it)
    pub phone: Option<Option<String>>,
    /// New active flag
    pub active: Option<bool>,
}

impl UserUpdate {
    /// Validate the fields being changed
    pub fn validate(&self) -> AccessControlResult<()> {
        if let Some(username) = &self.username {
            validate_name("username", username)?;
        }
        if let Some(phone) = &self.phone {
            validate_max_length("phone", phone.as_deref(), MAX_PHONE_LENGTH)?;
        }
        Ok(())
    }

    pub(crate) fn apply(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(username) = self.username {
            user.username = username.trim().to_string();
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(active) = self.active {
            user.active = active;
        }
        user.updated_at = now;
    }
}
