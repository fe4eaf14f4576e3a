//! Repository for the `transactions` table.
//!
//! Every write here also moves account balances. Both happen inside one
//! database transaction; the balance update is a relative
//! `balance = balance + delta` so concurrent postings to the same account
//! serialize on the row lock instead of overwriting each other.

use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::money::BalanceAdjustment;
use fintrack_core::pagination::{Page, PageRequest};
use fintrack_core::types::{new_id, Timestamp};
use sqlx::PgConnection;

use super::filter::{SqlValue, WhereBuilder};
use super::TransactionRepository;
use crate::error::RepoResult;
use crate::models::transaction::{NewTransaction, Transaction, TransactionFilter};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, account_id, description, amount, transaction_date, transaction_type, \
                       created_by, created_at, updated_by, updated_at";

/// PostgreSQL implementation of [`TransactionRepository`].
#[derive(Clone)]
pub struct PgTransactionRepo {
    pool: DbPool,
}

impl PgTransactionRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Apply one balance adjustment. Returns `false` if the account is gone.
    async fn adjust_balance(
        conn: &mut PgConnection,
        adjustment: &BalanceAdjustment,
        actor: &str,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE accounts SET
                balance = balance + $2,
                updated_by = $3,
                updated_at = $4
             WHERE id = $1",
        )
        .bind(&adjustment.account_id)
        .bind(adjustment.delta)
        .bind(actor)
        .bind(at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepo {
    async fn create(
        &self,
        input: &NewTransaction,
        adjustment: &BalanceAdjustment,
    ) -> RepoResult<Option<Transaction>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        if !Self::adjust_balance(&mut tx, adjustment, &input.created_by, now).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO transactions
                (id, account_id, description, amount, transaction_date, transaction_type,
                 created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Transaction>(&query)
            .bind(new_id())
            .bind(&input.account_id)
            .bind(&input.description)
            .bind(input.amount)
            .bind(input.transaction_date)
            .bind(input.transaction_type.as_str())
            .bind(&input.created_by)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Transaction>> {
        let query = format!("SELECT {COLUMNS} FROM transactions WHERE id = $1");
        let row = sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        transaction: &Transaction,
        adjustments: &[BalanceAdjustment],
    ) -> RepoResult<Option<Transaction>> {
        let actor = transaction.updated_by.as_deref().unwrap_or(&transaction.created_by);
        let at = transaction.updated_at.unwrap_or_else(Utc::now);
        let mut tx = self.pool.begin().await?;

        for adjustment in adjustments {
            if !Self::adjust_balance(&mut tx, adjustment, actor, at).await? {
                tx.rollback().await?;
                return Ok(None);
            }
        }

        let query = format!(
            "UPDATE transactions SET
                account_id = $2,
                description = $3,
                amount = $4,
                transaction_date = $5,
                transaction_type = $6,
                updated_by = $7,
                updated_at = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Transaction>(&query)
            .bind(&transaction.id)
            .bind(&transaction.account_id)
            .bind(&transaction.description)
            .bind(transaction.amount)
            .bind(transaction.transaction_date)
            .bind(transaction.transaction_type.as_str())
            .bind(&transaction.updated_by)
            .bind(transaction.updated_at)
            .fetch_optional(&mut *tx)
            .await?;

        match row {
            Some(row) => {
                tx.commit().await?;
                Ok(Some(row))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    async fn delete(
        &self,
        id: &str,
        adjustment: &BalanceAdjustment,
        deleted_by: &str,
    ) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if !deleted || !Self::adjust_balance(&mut tx, adjustment, deleted_by, Utc::now()).await? {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn list(
        &self,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> RepoResult<Page<Transaction>> {
        let mut w = WhereBuilder::default();
        w.push_text("account_id = ", &filter.account_id);
        w.push_text("description = ", &filter.description);
        w.push_text(
            "transaction_type = ",
            &filter.transaction_type.map(|t| t.as_str().to_string()),
        );
        if let Some(amount) = filter.amount {
            w.push("amount = ", SqlValue::Number(amount));
        }
        w.push_time("transaction_date >= ", &filter.from_transaction_date);
        w.push_time("transaction_date <= ", &filter.to_transaction_date);
        w.push_time("created_at >= ", &filter.from_date);
        w.push_time("created_at <= ", &filter.to_date);

        let total_count: i64 = w
            .count_query("transactions")
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let items = w
            .page_query(COLUMNS, "transactions", page)
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page { items, total_count })
    }
}
