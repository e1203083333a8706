//! In-memory user and refresh-token store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::Mutex;
use tracing::debug;

use eventdesk_core::error::AppError;
use eventdesk_core::result::AppResult;
use eventdesk_core::types::UserId;
use eventdesk_entity::token::RefreshTokenRecord;
use eventdesk_entity::user::{NewUser, ProfilePatch, User};

use crate::repositories::{RefreshTokenRepository, UserRepository};

/// Credential store backed by process memory.
///
/// Implements both repository traits. Clones share the same state.
/// Refresh tokens sit behind one Tokio mutex so rotation is atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    users: Arc<DashMap<UserId, User>>,
    emails: Arc<DashMap<String, UserId>>,
    tokens: Arc<Mutex<HashMap<String, RefreshTokenRecord>>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of refresh-token records, revoked ones included.
    pub async fn token_count(&self) -> usize {
        self.tokens.lock().await.len()
    }
}

#[async_trait]
impl UserRepository for MemoryCredentialStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn create(&self, data: NewUser) -> AppResult<User> {
        let user = data.into_user(Utc::now());

        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("User with this email already exists")),
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                debug!(user_id = %user.id, "User inserted into memory store");
                Ok(user)
            }
        }
    }

    async fn update_profile(&self, id: UserId, patch: &ProfilePatch) -> AppResult<Option<User>> {
        Ok(self.users.get_mut(&id).map(|mut user| {
            patch.apply(user.value_mut(), Utc::now());
            user.value().clone()
        }))
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<bool> {
        Ok(match self.users.get_mut(&id) {
            Some(mut user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn set_active(&self, id: UserId, active: bool) -> AppResult<bool> {
        Ok(match self.users.get_mut(&id) {
            Some(mut user) => {
                user.is_active = active;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryCredentialStore {
    async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()> {
        let mut tokens = self.tokens.lock().await;
        tokens.insert(record.token_hash.clone(), record.clone());
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshTokenRecord>> {
        let tokens = self.tokens.lock().await;
        Ok(tokens.get(token_hash).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<RefreshTokenRecord>> {
        let tokens = self.tokens.lock().await;
        let mut records: Vec<RefreshTokenRecord> = tokens
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(records)
    }

    async fn revoke(&self, token_hash: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let mut tokens = self.tokens.lock().await;
        Ok(tokens
            .get_mut(token_hash)
            .is_some_and(|record| record.revoke(now)))
    }

    async fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tokens = self.tokens.lock().await;
        let count = tokens
            .values_mut()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.revoke(now))
            .filter(|flipped| *flipped)
            .count();
        Ok(count as u64)
    }

    async fn rotate(
        &self,
        old_hash: &str,
        successor: &RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tokens = self.tokens.lock().await;

        match tokens.get_mut(old_hash) {
            Some(record) if record.is_active(now) => {
                record.revoke(now);
            }
            _ => return Ok(false),
        }

        tokens.insert(successor.token_hash.clone(), successor.clone());
        Ok(true)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tokens = self.tokens.lock().await;
        let before = tokens.len();
        tokens.retain(|_, r| !r.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }
}
