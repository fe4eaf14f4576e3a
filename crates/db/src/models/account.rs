//! Account entity model and DTOs.

use fintrack_core::money::AccountType;
use fintrack_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `accounts` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub balance: Decimal,
    #[sqlx(try_from = "String")]
    pub account_type: AccountType,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_by: Option<String>,
    pub updated_at: Option<Timestamp>,
}

/// Values needed to insert an account. The repository assigns `id` and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: DbId,
    pub name: String,
    pub balance: Decimal,
    pub account_type: AccountType,
    pub created_by: String,
}

/// Edits applied to an existing account. A `None` balance leaves the
/// stored balance as it is, so concurrent transaction postings survive a
/// rename.
#[derive(Debug, Clone)]
pub struct AccountChanges {
    pub name: String,
    pub account_type: AccountType,
    pub balance: Option<Decimal>,
    pub updated_by: String,
    pub updated_at: Timestamp,
}

/// List filters. Every populated field narrows the result.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Case-insensitive substring match.
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub created_by: Option<String>,
    pub from_date: Option<Timestamp>,
    pub to_date: Option<Timestamp>,
}
