//! JWT token creation with separate access and refresh secrets.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;

use eventdesk_core::config::AuthConfig;
use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;
use eventdesk_core::types::TokenId;
use eventdesk_entity::token::TokenPair;
use eventdesk_entity::user::User;

use super::claims::{AccessClaims, RefreshClaims, TokenType};

/// Creates signed HS256 access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails with `Configuration` if a token lifetime does not fit a
    /// `TimeDelta`.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let access_ttl = i64::try_from(config.access_token_ttl_minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .ok_or_else(|| {
                AppError::configuration("auth.access_token_ttl_minutes is out of range")
            })?;
        let refresh_ttl = i64::try_from(config.refresh_token_ttl_days)
            .ok()
            .and_then(TimeDelta::try_days)
            .ok_or_else(|| AppError::configuration("auth.refresh_token_ttl_days is out of range"))?;

        Ok(Self {
            access_key: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        })
    }

    /// Issues an access token carrying the user's id and role.
    pub fn issue_access_token(&self, user: &User) -> AppResult<(String, DateTime<Utc>)> {
        let (iat, exp, expires_at) = window(self.access_ttl)?;
        let claims = AccessClaims {
            sub: user.id,
            role: user.role,
            iat,
            exp,
            jti: TokenId::new(),
            typ: TokenType::Access,
        };
        let token = sign(&claims, &self.access_key, "access")?;
        Ok((token, expires_at))
    }

    /// Issues a refresh token for the user.
    pub fn issue_refresh_token(&self, user: &User) -> AppResult<(String, DateTime<Utc>)> {
        let (iat, exp, expires_at) = window(self.refresh_ttl)?;
        let claims = RefreshClaims {
            sub: user.id,
            iat,
            exp,
            jti: TokenId::new(),
            typ: TokenType::Refresh,
        };
        let token = sign(&claims, &self.refresh_key, "refresh")?;
        Ok((token, expires_at))
    }

    /// Issues a fresh access + refresh pair.
    pub fn issue_pair(&self, user: &User) -> AppResult<TokenPair> {
        let (access_token, access_expires_at) = self.issue_access_token(user)?;
        let (refresh_token, refresh_expires_at) = self.issue_refresh_token(user)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }
}

/// Returns `(iat, exp, exp as DateTime)` truncated to whole seconds, so the
/// instant reported to callers equals the encoded `exp`.
fn window(ttl: TimeDelta) -> AppResult<(i64, i64, DateTime<Utc>)> {
    let now = Utc::now();
    let iat = now.timestamp();
    let exp = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::internal("Token expiry is out of range"))?
        .timestamp();
    let expires_at = DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AppError::internal("Token expiry is out of range"))?;
    Ok((iat, exp, expires_at))
}

fn sign<C: Serialize>(claims: &C, key: &EncodingKey, kind: &str) -> AppResult<String> {
    encode(&Header::default(), claims, key)
        .map_err(|e| AppError::internal(format!("Failed to encode {kind} token: {e}")))
}
