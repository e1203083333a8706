//! Server-side shadow of an issued refresh token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventdesk_core::types::{TokenId, UserId};

/// One issued refresh token.
///
/// Only the SHA-256 digest of the token is stored, so a leaked table
/// cannot be replayed as credentials.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshTokenRecord {
    /// Hex SHA-256 digest of the token value.
    pub token_hash: String,
    /// The token's `jti` claim.
    pub token_id: TokenId,
    /// Owning user.
    pub user_id: UserId,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// Mirrors the token's encoded `exp`.
    pub expires_at: DateTime<Utc>,
    /// Set once on logout, rotation, or bulk revocation. Never cleared.
    pub revoked: bool,
    /// When the record was revoked.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Creates an unrevoked record.
    pub fn new(
        token_hash: String,
        token_id: TokenId,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token_hash,
            token_id,
            user_id,
            issued_at,
            expires_at,
            revoked: false,
            revoked_at: None,
        }
    }

    /// Returns `true` if the record has passed its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// A record may be exchanged only while neither revoked nor expired.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }

    /// Marks the record revoked. Returns `false` if it already was.
    pub fn revoke(&mut self, now: DateTime<Utc>) -> bool {
        if self.revoked {
            return false;
        }
        self.revoked = true;
        self.revoked_at = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_in: Duration) -> RefreshTokenRecord {
        let now = Utc::now();
        RefreshTokenRecord::new(
            "digest".to_string(),
            TokenId::new(),
            UserId::new(),
            now,
            now + expires_in,
        )
    }

    #[test]
    fn test_active_until_expiry() {
        let rec = record(Duration::days(7));
        assert!(rec.is_active(Utc::now()));
        assert!(!rec.is_active(Utc::now() + Duration::days(8)));
    }

    #[test]
    fn test_revoke_once() {
        let mut rec = record(Duration::days(7));
        assert!(rec.revoke(Utc::now()));
        assert!(!rec.revoke(Utc::now()));
        assert!(!rec.is_active(Utc::now()));
        assert!(rec.revoked_at.is_some());
    }
}
