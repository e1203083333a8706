//! Input records for the session lifecycle operations.
//!
//! Field names follow the public JSON API (camelCase). Shape validation
//! happens upstream; the manager only re-checks required fields are present.

use serde::{Deserialize, Serialize};

use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;
use eventdesk_entity::user::{ProfilePatch, UserRole};

/// Signup input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Email address; normalized before lookup and insert.
    pub email: String,
    /// Plaintext password. Hashed immediately and never logged.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Falls back to the configured default role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Optional contact number; blank is treated as absent.
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Login input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address, matched case-insensitively.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Change-password input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Must match the stored hash.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Profile patch input. Blank values leave the stored field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// New contact number.
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfilePatch {
            full_name: req.full_name,
            phone_number: req.phone_number,
        }
        .normalized()
    }
}

/// Fails with `Validation` if `value` is blank.
pub(crate) fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_uses_camel_case() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"a@x.com","password":"Abcd1234","fullName":"A B","role":"vendor"}"#,
        )
        .unwrap();
        assert_eq!(req.full_name, "A B");
        assert_eq!(req.role, Some(UserRole::Vendor));
        assert!(req.phone_number.is_none());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<SignupRequest, _> = serde_json::from_str(
            r#"{"email":"a@x.com","password":"p","fullName":"A","role":"manager"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_require() {
        assert!(require("email", "a@x.com").is_ok());
        let err = require("password", "   ").unwrap_err();
        assert_eq!(err.message, "password is required");
    }

    #[test]
    fn test_update_request_drops_blank_fields() {
        let patch: ProfilePatch = UpdateProfileRequest {
            full_name: Some(String::new()),
            phone_number: None,
        }
        .into();
        assert!(patch.is_empty());
    }
}
