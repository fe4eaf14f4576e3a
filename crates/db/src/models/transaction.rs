//! Transaction entity model and DTOs.

use fintrack_core::money::TransactionType;
use fintrack_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `transactions` table. `amount` is always positive; the
/// direction comes from `transaction_type`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: DbId,
    pub account_id: DbId,
    pub description: String,
    pub amount: Decimal,
    pub transaction_date: Timestamp,
    #[sqlx(try_from = "String")]
    pub transaction_type: TransactionType,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_by: Option<String>,
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: DbId,
    pub description: String,
    pub amount: Decimal,
    pub transaction_date: Timestamp,
    pub transaction_type: TransactionType,
    pub created_by: String,
}

/// List filters. `description`, `transaction_type` and `amount` match
/// exactly; date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<DbId>,
    pub description: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub from_transaction_date: Option<Timestamp>,
    pub to_transaction_date: Option<Timestamp>,
    pub from_date: Option<Timestamp>,
    pub to_date: Option<Timestamp>,
}
