//! Session lifecycle manager: signup, login, refresh, logout, and the
//! self-service account operations.
//!
//! Each refresh-token lineage moves `ISSUED -> ROTATED* -> REVOKED`.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use eventdesk_core::config::AuthConfig;
use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;
use eventdesk_core::types::UserId;
use eventdesk_database::repositories::{RefreshTokenRepository, UserRepository};
use eventdesk_database::with_timeout;
use eventdesk_entity::token::TokenPair;
use eventdesk_entity::user::{NewUser, ProfilePatch, User, UserProfile, UserRole};

use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;
use crate::rbac::Identity;

use super::requests::{
    ChangePasswordRequest, LoginRequest, SignupRequest, UpdateProfileRequest, require,
};
use super::store::{INVALID_REFRESH_TOKEN, RefreshTokenStore};

/// Message for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Message for a wrong current password on change-password.
pub const WRONG_CURRENT_PASSWORD: &str = "Current password is incorrect";

/// Result of a successful signup or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// The authenticated user.
    pub user: UserProfile,
    /// Freshly issued token pair.
    pub tokens: TokenPair,
}

/// Drives every session lifecycle operation.
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserRepository>,
    tokens: RefreshTokenStore,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    hasher: Arc<PasswordHasher>,
    default_role: UserRole,
    store_timeout: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("default_role", &self.default_role)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

impl SessionManager {
    /// Creates a manager over the given stores.
    ///
    /// Fails with `Configuration` if the config is invalid or names an
    /// unknown default role.
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn RefreshTokenRepository>,
    ) -> AppResult<Self> {
        config.validate()?;

        let default_role: UserRole = config.default_role.parse().map_err(|_| {
            AppError::configuration(format!(
                "auth.default_role '{}' is not a known role",
                config.default_role
            ))
        })?;

        let store_timeout = Duration::from_millis(config.store_timeout_ms);
        let decoder = Arc::new(JwtDecoder::new(config));

        Ok(Self {
            users,
            tokens: RefreshTokenStore::new(tokens, decoder.clone(), store_timeout),
            encoder: Arc::new(JwtEncoder::new(config)?),
            decoder,
            hasher: Arc::new(PasswordHasher::new(&config.password_hash)?),
            default_role,
            store_timeout,
        })
    }

    /// The refresh-token store used by this manager.
    pub fn token_store(&self) -> &RefreshTokenStore {
        &self.tokens
    }

    /// The password hasher used by this manager.
    pub fn password_hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Registers a user and opens their first session.
    pub async fn signup(&self, req: SignupRequest) -> AppResult<AuthSession> {
        require("email", &req.email)?;
        require("password", &req.password)?;
        require("fullName", &req.full_name)?;

        let email = User::normalize_email(&req.email);

        if self.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User with this email already exists"));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;
        let phone_number = req
            .phone_number
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let new_user = NewUser {
            email,
            password_hash,
            full_name: req.full_name.trim().to_string(),
            role: req.role.unwrap_or(self.default_role),
            phone_number,
        };

        let user = with_timeout(
            self.store_timeout,
            "user.create",
            self.users.create(new_user),
        )
        .await?;

        let tokens = self.open_session(&user).await?;
        info!(user_id = %user.id, role = %user.role, "User signed up");

        Ok(AuthSession {
            user: user.profile(),
            tokens,
        })
    }

    /// Authenticates by email and password and opens a session.
    ///
    /// Unknown email, inactive account, and wrong password all fail the
    /// same way and all pay for one Argon2 verification.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthSession> {
        require("email", &req.email)?;
        require("password", &req.password)?;

        let email = User::normalize_email(&req.email);

        let Some(user) = self.find_user_by_email(&email).await? else {
            self.hasher.verify_decoy(&req.password)?;
            debug!("Login rejected: unknown email");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !user.can_login() {
            self.hasher.verify_decoy(&req.password)?;
            debug!(user_id = %user.id, "Login rejected: account inactive");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        if !self.hasher.verify_password(&req.password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let tokens = self.open_session(&user).await?;
        info!(user_id = %user.id, "Login successful");

        Ok(AuthSession {
            user: user.profile(),
            tokens,
        })
    }

    /// Exchanges a live refresh token for a new pair, retiring the old one.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        require("refreshToken", refresh_token)?;

        let claims = self
            .decoder
            .verify_refresh_token(refresh_token)
            .map_err(|_| AppError::authentication(INVALID_REFRESH_TOKEN))?;

        if !self.tokens.is_valid(refresh_token).await? {
            debug!(user_id = %claims.sub, "Refresh rejected: token revoked or unknown");
            return Err(AppError::authentication(INVALID_REFRESH_TOKEN));
        }

        let user = self
            .find_user(claims.user_id())
            .await?
            .filter(User::can_login)
            .ok_or_else(|| {
                debug!(user_id = %claims.sub, "Refresh rejected: user missing or inactive");
                AppError::authentication(INVALID_REFRESH_TOKEN)
            })?;

        let pair = self.encoder.issue_pair(&user)?;
        self.tokens
            .rotate(refresh_token, user.id, &pair.refresh_token)
            .await?;

        info!(user_id = %user.id, "Tokens refreshed");
        Ok(pair)
    }

    /// Ends the session behind `refresh_token`.
    ///
    /// An absent, malformed, unknown, or already revoked token is a no-op.
    /// Store failures still propagate.
    pub async fn logout(&self, refresh_token: Option<&str>) -> AppResult<()> {
        let Some(token) = refresh_token.filter(|t| !t.trim().is_empty()) else {
            return Ok(());
        };

        if self.tokens.revoke(token).await? {
            info!("Session logged out");
        } else {
            debug!("Logout for unknown or already revoked token");
        }
        Ok(())
    }

    /// Ends every session of the user. Returns the number revoked.
    pub async fn logout_all(&self, user_id: UserId) -> AppResult<u64> {
        self.tokens.revoke_all_for_user(user_id).await
    }

    /// Replaces the password after checking the current one, then signs the
    /// user out everywhere.
    pub async fn change_password(
        &self,
        user_id: UserId,
        req: ChangePasswordRequest,
    ) -> AppResult<()> {
        require("currentPassword", &req.current_password)?;
        require("newPassword", &req.new_password)?;

        let user = self
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !self
            .hasher
            .verify_password(&req.current_password, &user.password_hash)?
        {
            debug!(user_id = %user_id, "Password change rejected: wrong current password");
            return Err(AppError::authentication(WRONG_CURRENT_PASSWORD));
        }

        let new_hash = self.hasher.hash_password(&req.new_password)?;
        let updated = with_timeout(
            self.store_timeout,
            "user.update_password",
            self.users.update_password(user_id, &new_hash),
        )
        .await?;
        if !updated {
            return Err(AppError::not_found("User not found"));
        }

        // Revocation must follow the hash update.
        if let Err(e) = self.tokens.revoke_all_for_user(user_id).await {
            warn!(user_id = %user_id, error = %e, "Password changed but session revocation failed");
            return Err(e);
        }

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Returns the caller's profile.
    pub async fn get_profile(&self, user_id: UserId) -> AppResult<UserProfile> {
        self.find_user(user_id)
            .await?
            .map(|u| u.profile())
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Patches the caller's name and phone number.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        req: UpdateProfileRequest,
    ) -> AppResult<UserProfile> {
        let patch = ProfilePatch::from(req);

        if patch.is_empty() {
            return self.get_profile(user_id).await;
        }

        let user = with_timeout(
            self.store_timeout,
            "user.update_profile",
            self.users.update_profile(user_id, &patch),
        )
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %user_id, "Profile updated");
        Ok(user.profile())
    }

    /// Resolves an `Authorization` header value into an identity.
    ///
    /// Accepts either `Bearer <token>` or the bare token.
    pub fn authenticate(&self, bearer: Option<&str>) -> AppResult<Identity> {
        let token = bearer
            .map(|h| h.trim())
            .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).trim())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthenticated("Authentication required"))?;

        self.decoder.verify_access_token(token)
    }

    /// Issues a pair and records the refresh half.
    async fn open_session(&self, user: &User) -> AppResult<TokenPair> {
        let pair = self.encoder.issue_pair(user)?;
        self.tokens.store(user.id, &pair.refresh_token).await?;
        Ok(pair)
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        with_timeout(self.store_timeout, "user.find_by_id", self.users.find_by_id(id)).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        with_timeout(
            self.store_timeout,
            "user.find_by_email",
            self.users.find_by_email(email),
        )
        .await
    }
}
