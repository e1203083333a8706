//! PostgreSQL refresh-token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use eventdesk_core::error::{AppError, ErrorKind};
use eventdesk_core::result::AppResult;
use eventdesk_core::types::UserId;
use eventdesk_entity::token::RefreshTokenRecord;

use super::RefreshTokenRepository;

const INSERT_SQL: &str = "INSERT INTO refresh_tokens \
     (token_hash, token_id, user_id, issued_at, expires_at, revoked, revoked_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7)";

/// Repository for refresh-token rows.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    /// Create a new refresh-token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()> {
        sqlx::query(INSERT_SQL)
            .bind(&record.token_hash)
            .bind(record.token_id)
            .bind(record.user_id)
            .bind(record.issued_at)
            .bind(record.expires_at)
            .bind(record.revoked)
            .bind(record.revoked_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to store refresh token"))?;
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshTokenRecord>> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT * FROM refresh_tokens WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find refresh token"))
    }

    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<RefreshTokenRecord>> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT * FROM refresh_tokens WHERE user_id = $1 ORDER BY issued_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list refresh tokens"))
    }

    async fn revoke(&self, token_hash: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = $2 \
             WHERE token_hash = $1 AND revoked = FALSE",
        )
        .bind(token_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to revoke refresh token"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = $2 \
             WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to revoke user refresh tokens"))?;

        Ok(result.rows_affected())
    }

    async fn rotate(
        &self,
        old_hash: &str,
        successor: &RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin rotation"))?;

        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = $2 \
             WHERE token_hash = $1 AND revoked = FALSE AND expires_at > $2",
        )
        .bind(old_hash)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to revoke rotated refresh token"))?;

        if revoked.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(db_error("Failed to roll back rotation"))?;
            return Ok(false);
        }

        sqlx::query(INSERT_SQL)
            .bind(&successor.token_hash)
            .bind(successor.token_id)
            .bind(successor.user_id)
            .bind(successor.issued_at)
            .bind(successor.expires_at)
            .bind(successor.revoked)
            .bind(successor.revoked_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to store rotated refresh token"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit rotation"))?;

        Ok(true)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to purge expired refresh tokens"))?;

        Ok(result.rows_affected())
    }
}
