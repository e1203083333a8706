//! JWT token validation.
//!
//! Every failure collapses to one `Authentication` error with a fixed
//! message. The precise decode reason is logged at `debug` level only.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;
use tracing::debug;

use eventdesk_core::config::AuthConfig;
use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;

use crate::rbac::Identity;

use super::claims::{AccessClaims, RefreshClaims, TokenType};

/// Message attached to every token verification failure.
pub const INVALID_TOKEN: &str = "Invalid or expired token";

/// Verifies access and refresh tokens against their own secrets.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.token_leeway_seconds;

        Self {
            access_key: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies an access token and returns the identity it proves.
    pub fn verify_access_token(&self, token: &str) -> AppResult<Identity> {
        let claims: AccessClaims = self.decode_token(token, &self.access_key, "access")?;

        if claims.typ != TokenType::Access {
            debug!(token_type = ?claims.typ, "Rejected non-access token");
            return Err(AppError::authentication(INVALID_TOKEN));
        }

        Ok(Identity::new(claims.sub, claims.role))
    }

    /// Verifies a refresh token and returns its claims.
    ///
    /// This checks the signature and expiry only. Whether the token is still
    /// live server-side is the store's concern.
    pub fn verify_refresh_token(&self, token: &str) -> AppResult<RefreshClaims> {
        let claims: RefreshClaims = self.decode_token(token, &self.refresh_key, "refresh")?;

        if claims.typ != TokenType::Refresh {
            debug!(token_type = ?claims.typ, "Rejected non-refresh token");
            return Err(AppError::authentication(INVALID_TOKEN));
        }

        Ok(claims)
    }

    fn decode_token<C: DeserializeOwned>(
        &self,
        token: &str,
        key: &DecodingKey,
        kind: &'static str,
    ) -> AppResult<C> {
        decode::<C>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(kind, reason = ?e.kind(), "Token verification failed");
                AppError::authentication(INVALID_TOKEN)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use chrono::Utc;
    use eventdesk_core::error::ErrorKind;
    use eventdesk_entity::user::{NewUser, User, UserRole};
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn config() -> AuthConfig {
        AuthConfig {
            access_token_secret: "access-secret-for-tests".to_string(),
            refresh_token_secret: "refresh-secret-for-tests".to_string(),
            ..AuthConfig::default()
        }
    }

    fn user(role: UserRole) -> User {
        NewUser {
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            full_name: "A B".to_string(),
            role,
            phone_number: None,
        }
        .into_user(Utc::now())
    }

    #[test]
    fn test_access_round_trip_recovers_identity() {
        let config = config();
        let encoder = JwtEncoder::new(&config).unwrap();
        let decoder = JwtDecoder::new(&config);
        let user = user(UserRole::Vendor);

        let (token, _) = encoder.issue_access_token(&user).unwrap();
        let identity = decoder.verify_access_token(&token).unwrap();

        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, UserRole::Vendor);
    }

    #[test]
    fn test_refresh_expiry_matches_encoded_exp() {
        let config = config();
        let encoder = JwtEncoder::new(&config).unwrap();
        let decoder = JwtDecoder::new(&config);

        let (token, expires_at) = encoder.issue_refresh_token(&user(UserRole::Planner)).unwrap();
        let claims = decoder.verify_refresh_token(&token).unwrap();

        assert_eq!(claims.expires_at(), expires_at);
    }

    #[test]
    fn test_tokens_do_not_cross_verify() {
        let config = config();
        let encoder = JwtEncoder::new(&config).unwrap();
        let decoder = JwtDecoder::new(&config);
        let pair = encoder.issue_pair(&user(UserRole::Admin)).unwrap();

        let err = decoder.verify_refresh_token(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        let err = decoder.verify_access_token(&pair.refresh_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_two_refresh_tokens_differ() {
        let encoder = JwtEncoder::new(&config()).unwrap();
        let user = user(UserRole::Planner);

        let (a, _) = encoder.issue_refresh_token(&user).unwrap();
        let (b, _) = encoder.issue_refresh_token(&user).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = config();
        let decoder = JwtDecoder::new(&config);
        let user = user(UserRole::Planner);
        let past = Utc::now().timestamp() - 3_600;

        let claims = AccessClaims {
            sub: user.id,
            role: user.role,
            iat: past - 900,
            exp: past,
            jti: eventdesk_core::types::TokenId::new(),
            typ: TokenType::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_token_secret.as_bytes()),
        )
        .unwrap();

        let err = decoder.verify_access_token(&token).unwrap_err();
        assert_eq!(err.message, INVALID_TOKEN);
    }

    #[test]
    fn test_garbage_rejected() {
        let decoder = JwtDecoder::new(&config());
        assert!(decoder.verify_access_token("not-a-jwt").is_err());
        assert!(decoder.verify_refresh_token("").is_err());
    }
}
