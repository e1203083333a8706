//! Refresh-token persistence on top of a [`RefreshTokenRepository`].
//!
//! Raw token values never reach the repository: every lookup goes through
//! the hex SHA-256 digest of the token.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;
use eventdesk_core::types::UserId;
use eventdesk_database::repositories::RefreshTokenRepository;
use eventdesk_database::with_timeout;
use eventdesk_entity::token::RefreshTokenRecord;

use crate::jwt::JwtDecoder;

/// Message for every refused refresh.
pub const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";

/// Hex SHA-256 digest used as the record key.
pub fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Stores, validates, rotates, and revokes refresh tokens.
#[derive(Debug, Clone)]
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    decoder: Arc<JwtDecoder>,
    timeout: Duration,
}

impl RefreshTokenStore {
    /// Creates a store; every repository call is bounded by `timeout`.
    pub fn new(
        repo: Arc<dyn RefreshTokenRepository>,
        decoder: Arc<JwtDecoder>,
        timeout: Duration,
    ) -> Self {
        Self {
            repo,
            decoder,
            timeout,
        }
    }

    /// Builds the record for a freshly issued token owned by `user_id`.
    fn record_for(&self, user_id: UserId, token: &str) -> AppResult<RefreshTokenRecord> {
        let claims = self.decoder.verify_refresh_token(token)?;
        if claims.user_id() != user_id {
            return Err(AppError::internal(
                "Refresh token subject does not match its owner",
            ));
        }

        Ok(RefreshTokenRecord::new(
            token_digest(token),
            claims.jti,
            user_id,
            claims.issued_at(),
            claims.expires_at(),
        ))
    }

    /// Persists a newly issued refresh token.
    pub async fn store(&self, user_id: UserId, token: &str) -> AppResult<()> {
        let record = self.record_for(user_id, token)?;
        with_timeout(self.timeout, "refresh_token.insert", self.repo.insert(&record)).await?;
        debug!(user_id = %user_id, token_id = %record.token_id, "Refresh token stored");
        Ok(())
    }

    /// Returns `true` iff the token verifies and its record is live and
    /// owned by the token's subject.
    ///
    /// A token that fails verification is `Ok(false)`, not an error.
    pub async fn is_valid(&self, token: &str) -> AppResult<bool> {
        let Ok(claims) = self.decoder.verify_refresh_token(token) else {
            return Ok(false);
        };

        let digest = token_digest(token);
        let record = with_timeout(
            self.timeout,
            "refresh_token.find_by_hash",
            self.repo.find_by_hash(&digest),
        )
        .await?;

        Ok(record.is_some_and(|r| r.user_id == claims.user_id() && r.is_active(Utc::now())))
    }

    /// Marks the token's record revoked. Unknown or already revoked tokens
    /// are not an error; returns whether anything changed.
    pub async fn revoke(&self, token: &str) -> AppResult<bool> {
        let digest = token_digest(token);
        with_timeout(
            self.timeout,
            "refresh_token.revoke",
            self.repo.revoke(&digest, Utc::now()),
        )
        .await
    }

    /// Revokes every live refresh token of a user. Returns the count.
    pub async fn revoke_all_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let count = with_timeout(
            self.timeout,
            "refresh_token.revoke_all_for_user",
            self.repo.revoke_all_for_user(user_id, Utc::now()),
        )
        .await?;
        info!(user_id = %user_id, count, "Revoked all refresh tokens");
        Ok(count)
    }

    /// Revokes `old_token` and stores `new_token` as one step.
    ///
    /// Fails with `Authentication` if `old_token` was already revoked or
    /// expired, including when a concurrent rotation got there first.
    pub async fn rotate(&self, old_token: &str, user_id: UserId, new_token: &str) -> AppResult<()> {
        let successor = self.record_for(user_id, new_token)?;
        let old_digest = token_digest(old_token);

        let rotated = with_timeout(
            self.timeout,
            "refresh_token.rotate",
            self.repo.rotate(&old_digest, &successor, Utc::now()),
        )
        .await?;

        if !rotated {
            debug!(user_id = %user_id, "Refresh token rotation lost or predecessor inactive");
            return Err(AppError::authentication(INVALID_REFRESH_TOKEN));
        }

        debug!(user_id = %user_id, token_id = %successor.token_id, "Refresh token rotated");
        Ok(())
    }

    /// Deletes expired records. Returns the count.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        with_timeout(
            self.timeout,
            "refresh_token.delete_expired",
            self.repo.delete_expired(Utc::now()),
        )
        .await
    }

    /// A user's records, newest first.
    pub async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<RefreshTokenRecord>> {
        with_timeout(
            self.timeout,
            "refresh_token.find_by_user",
            self.repo.find_by_user(user_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use chrono::TimeDelta;
    use eventdesk_core::config::AuthConfig;
    use eventdesk_database::MemoryCredentialStore;
    use eventdesk_entity::user::{NewUser, User, UserRole};

    fn fixture() -> (RefreshTokenStore, JwtEncoder, MemoryCredentialStore, User) {
        let config = AuthConfig {
            access_token_secret: "store-access-secret".to_string(),
            refresh_token_secret: "store-refresh-secret".to_string(),
            ..AuthConfig::default()
        };
        let memory = MemoryCredentialStore::new();
        let store = RefreshTokenStore::new(
            Arc::new(memory.clone()),
            Arc::new(JwtDecoder::new(&config)),
            Duration::from_secs(1),
        );
        let user = NewUser {
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            full_name: "A B".to_string(),
            role: UserRole::Planner,
            phone_number: None,
        }
        .into_user(Utc::now());
        (store, JwtEncoder::new(&config).unwrap(), memory, user)
    }

    #[tokio::test]
    async fn test_undecodable_token_is_not_valid() {
        let (store, _, _, _) = fixture();

        assert!(!store.is_valid("garbage").await.unwrap());
        assert!(!store.is_valid("").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_record_is_not_valid() {
        let (store, encoder, memory, user) = fixture();
        let (token, _) = encoder.issue_refresh_token(&user).unwrap();
        store.store(user.id, &token).await.unwrap();
        assert!(store.is_valid(&token).await.unwrap());

        let mut record = memory
            .find_by_hash(&token_digest(&token))
            .await
            .unwrap()
            .unwrap();
        record.expires_at = Utc::now() - TimeDelta::seconds(1);
        memory.insert(&record).await.unwrap();

        assert!(!store.is_valid(&token).await.unwrap());
    }

    #[tokio::test]
    async fn test_unstored_token_is_not_valid() {
        let (store, encoder, _, user) = fixture();
        let (token, _) = encoder.issue_refresh_token(&user).unwrap();

        assert!(!store.is_valid(&token).await.unwrap());
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = token_digest("abc");
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(token_digest("abd"), digest);
    }
}
