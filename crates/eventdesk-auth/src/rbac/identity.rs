//! The caller identity resolved from a verified access token.

use serde::{Deserialize, Serialize};

use eventdesk_core::types::UserId;
use eventdesk_entity::user::UserRole;

/// Verified `(user_id, role)` pair.
///
/// Produced only by [`JwtDecoder::verify_access_token`](crate::jwt::JwtDecoder::verify_access_token)
/// and passed explicitly to whatever needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// The token's subject.
    pub user_id: UserId,
    /// Role carried in the token, as of issue time.
    pub role: UserRole,
}

impl Identity {
    /// Creates an identity.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }
}
