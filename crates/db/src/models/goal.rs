//! Goal entity model and DTOs.

use chrono::NaiveDate;
use fintrack_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `goals` table.
///
/// `current_amount` is whatever the owner last reported; nothing derives it
/// from transactions.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub target_amount: Decimal,
    pub target_date: Timestamp,
    pub current_amount: Decimal,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_by: Option<String>,
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub user_id: DbId,
    pub name: String,
    pub target_amount: Decimal,
    pub target_date: Timestamp,
    pub current_amount: Decimal,
    pub created_by: String,
}

#[derive(Debug, Clone, Default)]
pub struct GoalFilter {
    pub user_id: Option<DbId>,
    /// Case-insensitive substring match.
    pub name: Option<String>,
    /// Same calendar day as `target_date`.
    pub target_date: Option<NaiveDate>,
    pub from_target_date: Option<NaiveDate>,
    pub to_target_date: Option<NaiveDate>,
    pub from_date: Option<Timestamp>,
    pub to_date: Option<Timestamp>,
}
