//! Repository for the `goals` table.

use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::pagination::{Page, PageRequest};
use fintrack_core::types::new_id;

use super::filter::WhereBuilder;
use super::GoalRepository;
use crate::error::RepoResult;
use crate::models::goal::{Goal, GoalFilter, NewGoal};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, target_amount, target_date, current_amount, \
                       created_by, created_at, updated_by, updated_at";

/// PostgreSQL implementation of [`GoalRepository`].
#[derive(Clone)]
pub struct PgGoalRepo {
    pool: DbPool,
}

impl PgGoalRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalRepository for PgGoalRepo {
    async fn create(&self, input: &NewGoal) -> RepoResult<Option<Goal>> {
        let query = format!(
            "INSERT INTO goals
                (id, user_id, name, target_amount, target_date, current_amount, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Goal>(&query)
            .bind(new_id())
            .bind(&input.user_id)
            .bind(&input.name)
            .bind(input.target_amount)
            .bind(input.target_date)
            .bind(input.current_amount)
            .bind(&input.created_by)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Goal>> {
        let query = format!("SELECT {COLUMNS} FROM goals WHERE id = $1");
        let row = sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, goal: &Goal) -> RepoResult<Option<Goal>> {
        let query = format!(
            "UPDATE goals SET
                name = $2,
                target_amount = $3,
                target_date = $4,
                current_amount = $5,
                updated_by = $6,
                updated_at = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Goal>(&query)
            .bind(&goal.id)
            .bind(&goal.name)
            .bind(goal.target_amount)
            .bind(goal.target_date)
            .bind(goal.current_amount)
            .bind(&goal.updated_by)
            .bind(goal.updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &GoalFilter, page: &PageRequest) -> RepoResult<Page<Goal>> {
        let mut w = WhereBuilder::default();
        w.push_text("user_id = ", &filter.user_id);
        w.push_contains("name", &filter.name);
        w.push_date("target_date::date = ", &filter.target_date);
        w.push_date("target_date::date >= ", &filter.from_target_date);
        w.push_date("target_date::date <= ", &filter.to_target_date);
        w.push_time("created_at >= ", &filter.from_date);
        w.push_time("created_at <= ", &filter.to_date);

        let total_count: i64 = w
            .count_query("goals")
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let items = w
            .page_query(COLUMNS, "goals", page)
            .build_query_as::<Goal>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page { items, total_count })
    }
}
