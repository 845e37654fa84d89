/*
 * Responsibility
 * - SQLx operations on the users table
 * - Users are created at sign-up and never updated here
 * - A duplicate account surfaces as RepoError::Conflict
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub account: String,
    /// bcrypt hash
    pub password: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_account(&self, account: &str) -> RepoResult<Option<UserRow>>;

    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<UserRow>>;

    async fn insert(&self, account: &str, password_hash: &str) -> RepoResult<UserRow>;
}

#[derive(Clone, Debug)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn find_by_account(&self, account: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, account, password
            FROM users
            WHERE account = $1
            "#,
        )
        .bind(account)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, account, password
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert(&self, account: &str, password_hash: &str) -> RepoResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (account, password)
            VALUES ($1, $2)
            RETURNING user_id, account, password
            "#,
        )
        .bind(account)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
