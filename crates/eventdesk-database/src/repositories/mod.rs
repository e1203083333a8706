//! Credential store contracts and their PostgreSQL implementations.

pub mod refresh_token;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use eventdesk_core::result::AppResult;
use eventdesk_core::types::UserId;
use eventdesk_entity::token::RefreshTokenRecord;
use eventdesk_entity::user::{NewUser, ProfilePatch, User};

pub use refresh_token::PgRefreshTokenRepository;
pub use user::PgUserRepository;

/// Durable user records.
///
/// Emails passed in are already normalized by the caller.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user. Fails with `Conflict` if the email is taken.
    async fn create(&self, data: NewUser) -> AppResult<User>;

    /// Patch profile fields. Returns `None` if the user does not exist.
    async fn update_profile(&self, id: UserId, patch: &ProfilePatch) -> AppResult<Option<User>>;

    /// Replace the password hash. Returns `false` if the user does not exist.
    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<bool>;

    /// Toggle the active flag. Returns `false` if the user does not exist.
    async fn set_active(&self, id: UserId, active: bool) -> AppResult<bool>;
}

/// Durable refresh-token records, keyed by token digest.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new record.
    async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()>;

    /// Find a record by token digest.
    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshTokenRecord>>;

    /// All records for a user, newest first.
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<RefreshTokenRecord>>;

    /// Revoke one record. Returns `true` only if this call flipped the flag.
    async fn revoke(&self, token_hash: &str, now: DateTime<Utc>) -> AppResult<bool>;

    /// Revoke every unrevoked record of a user in one operation.
    async fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64>;

    /// Revoke `old_hash` and insert `successor` as one atomic step.
    ///
    /// The revoke only applies to a record that is unrevoked and unexpired
    /// at `now`. Returns `false`, inserting nothing, when it does not
    /// apply, which is how a losing concurrent rotation is reported.
    async fn rotate(
        &self,
        old_hash: &str,
        successor: &RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Delete records whose expiry is at or before `now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
