//! Repository for the `accounts` table.

use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::money::AccountType;
use fintrack_core::pagination::{Page, PageRequest};
use fintrack_core::types::new_id;

use super::filter::WhereBuilder;
use super::AccountRepository;
use crate::error::RepoResult;
use crate::models::account::{Account, AccountChanges, AccountFilter, NewAccount};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, balance, account_type, \
                       created_by, created_at, updated_by, updated_at";

/// PostgreSQL implementation of [`AccountRepository`].
#[derive(Clone)]
pub struct PgAccountRepo {
    pool: DbPool,
}

impl PgAccountRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepo {
    /// Returns `None` when a concurrent insert won the unique
    /// `(user_id, name, account_type)` race.
    async fn create(&self, input: &NewAccount) -> RepoResult<Option<Account>> {
        let query = format!(
            "INSERT INTO accounts (id, user_id, name, balance, account_type, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_accounts_user_name_type DO NOTHING
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Account>(&query)
            .bind(new_id())
            .bind(&input.user_id)
            .bind(&input.name)
            .bind(input.balance)
            .bind(input.account_type.as_str())
            .bind(&input.created_by)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        let row = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn exists(&self, user_id: &str, name: &str, kind: AccountType) -> RepoResult<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM accounts
                 WHERE user_id = $1 AND name = $2 AND account_type = $3
             )",
        )
        .bind(user_id)
        .bind(name)
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    async fn update(&self, id: &str, changes: &AccountChanges) -> RepoResult<Option<Account>> {
        let query = format!(
            "UPDATE accounts SET
                name = $2,
                balance = COALESCE($3, balance),
                account_type = $4,
                updated_by = $5,
                updated_at = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(changes.balance)
            .bind(changes.account_type.as_str())
            .bind(&changes.updated_by)
            .bind(changes.updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &AccountFilter, page: &PageRequest) -> RepoResult<Page<Account>> {
        let mut w = WhereBuilder::default();
        w.push_contains("name", &filter.name);
        w.push_text(
            "account_type = ",
            &filter.account_type.map(|t| t.as_str().to_string()),
        );
        w.push_text("created_by = ", &filter.created_by);
        w.push_time("created_at >= ", &filter.from_date);
        w.push_time("created_at <= ", &filter.to_date);

        let total_count: i64 = w
            .count_query("accounts")
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let items = w
            .page_query(COLUMNS, "accounts", page)
            .build_query_as::<Account>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page { items, total_count })
    }
}
