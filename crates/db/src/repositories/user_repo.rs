//! Repository for the `users` table.

use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::types::{new_id, Timestamp};

use super::UserRepository;
use crate::error::RepoResult;
use crate::models::user::{NewUser, User};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_name, email, password_hash, first_name, last_name, roles, claims, \
                       security_stamp, refresh_token_hash, refresh_token_expires_at, \
                       created_at, updated_at";

/// PostgreSQL implementation of [`UserRepository`].
#[derive(Clone)]
pub struct PgUserRepo {
    pool: DbPool,
}

impl PgUserRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepo {
    /// Returns `None` when the user name or email is already taken.
    async fn create(&self, input: &NewUser) -> RepoResult<Option<User>> {
        let query = format!(
            "INSERT INTO users
                (id, user_name, email, password_hash, first_name, last_name, roles,
                 security_stamp, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(new_id())
            .bind(&input.user_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.roles)
            .bind(&input.security_stamp)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Email comparison is case-insensitive.
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// User name comparison is case-insensitive.
    async fn find_by_user_name(&self, user_name: &str) -> RepoResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(user_name) = LOWER($1)");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_refresh_token(
        &self,
        id: &str,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET
                refresh_token_hash = $2,
                refresh_token_expires_at = $3,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn revoke_tokens(&self, id: &str, new_stamp: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET
                security_stamp = $2,
                refresh_token_hash = NULL,
                refresh_token_expires_at = NULL,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(new_stamp)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
