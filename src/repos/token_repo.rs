use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoResult;

/// DB access for the per-user refresh token row.
///
/// Notes:
/// - We store only a SHA-256 digest of the refresh token, never the token itself.
/// - tokens.user_id is UNIQUE: a user has at most one row, created on first
///   login and overwritten afterwards.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_by_refresh_token_hash(&self, token_hash: &[u8]) -> RepoResult<Option<TokenRow>>;

    /// Create the user's row, or overwrite its refresh token if it already exists.
    async fn upsert_for_user(&self, user_id: Uuid, token_hash: Vec<u8>) -> RepoResult<TokenRow>;

    /// Replace the refresh token only if the row still holds `current_hash`.
    ///
    /// Returns false when another request rotated it first.
    async fn rotate(
        &self,
        token_id: i64,
        current_hash: &[u8],
        next_hash: Vec<u8>,
    ) -> RepoResult<bool>;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TokenRow {
    pub token_id: i64,
    pub user_id: Uuid,
    pub refresh_token_hash: Vec<u8>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct TokenRepo {
    pool: PgPool,
}

impl TokenRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepo {
    async fn find_by_refresh_token_hash(&self, token_hash: &[u8]) -> RepoResult<Option<TokenRow>> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            SELECT token_id, user_id, refresh_token_hash, updated_at
            FROM tokens
            WHERE refresh_token_hash = $1
            LIMIT 1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert_for_user(&self, user_id: Uuid, token_hash: Vec<u8>) -> RepoResult<TokenRow> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            INSERT INTO tokens (user_id, refresh_token_hash)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET refresh_token_hash = EXCLUDED.refresh_token_hash,
                updated_at = now()
            RETURNING token_id, user_id, refresh_token_hash, updated_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn rotate(
        &self,
        token_id: i64,
        current_hash: &[u8],
        next_hash: Vec<u8>,
    ) -> RepoResult<bool> {
        let done = sqlx::query(
            r#"
            UPDATE tokens
            SET refresh_token_hash = $3,
                updated_at = now()
            WHERE token_id = $1
                AND refresh_token_hash = $2
            "#,
        )
        .bind(token_id)
        .bind(current_hash)
        .bind(next_hash)
        .execute(&self.pool)
        .await?;

        Ok(done.rows_affected() == 1)
    }
}
