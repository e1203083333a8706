//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventdesk_core::types::UserId;

use super::role::UserRole;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Normalized email address, unique across users.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable name.
    pub full_name: String,
    /// User role (RBAC).
    pub role: UserRole,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Canonical form used for every email lookup and insert.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Outward-facing subset of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Normalized email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Assigned role.
    pub role: UserRole,
    /// Optional phone number.
    pub phone_number: Option<String>,
}

impl NewUser {
    /// Materializes the row that a store will persist.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: UserId::new(),
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            role: self.role,
            phone_number: self.phone_number,
            is_active: true,
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Patch for the self-service profile fields.
///
/// Password and role are deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    /// New full name.
    pub full_name: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
}

impl ProfilePatch {
    /// Drops blank values so they leave the stored field unchanged.
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            full_name: keep(self.full_name),
            phone_number: keep(self.phone_number),
        }
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone_number.is_none()
    }

    /// Applies the patch to a user in place.
    pub fn apply(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(full_name) = &self.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            user.phone_number = Some(phone_number.clone());
        }
        user.updated_at = now;
    }
}

/// Public view of a user, safe to return to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Normalized email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Role granted at signup.
    pub role: UserRole,
    /// Contact phone number, if given.
    pub phone_number: Option<String>,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            phone_number: user.phone_number.clone(),
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}
