//! Transaction operations and the balance workflow.
//!
//! A transaction never changes without its account balance changing with
//! it: every write hands the repository the [`BalanceAdjustment`]s it
//! implies, and the repository applies both in one unit of work.
//!
//! - create posts `+amount` (Income) or `-amount` (Expense);
//! - update reverses the old posting and applies the new one, on whichever
//!   accounts are involved;
//! - delete reverses the posting.

use chrono::Utc;
use fintrack_core::money::{repost, BalanceAdjustment, TransactionType};
use fintrack_core::pagination::PagedList;
use fintrack_core::types::{DbId, Timestamp};
use fintrack_core::validation::{not_blank, positive};
use fintrack_db::models::transaction::{NewTransaction, Transaction};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::{not_persisted, recover, ServiceResult};
use crate::links::Endpoint;
use crate::middleware::auth::AuthUser;
use crate::query::TransactionListParams;
use crate::response::{ApiResponse, Resource};
use crate::state::AppState;

const ACCOUNT_MISSING: &str = "Account does not exist";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[validate(custom(function = "not_blank"))]
    pub account_id: DbId,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    pub transaction_date: Timestamp,
    pub transaction_type: TransactionType,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[validate(custom(function = "not_blank"))]
    pub account_id: Option<DbId>,
    pub description: Option<String>,
    #[validate(custom(function = "positive"))]
    pub amount: Option<Decimal>,
    pub transaction_date: Option<Timestamp>,
    pub transaction_type: Option<TransactionType>,
}

fn resource(state: &AppState, transaction: Transaction) -> Resource<Transaction> {
    let links = state.links.resource_links(
        &transaction.id,
        Endpoint::GetTransaction,
        Some((Endpoint::UpdateTransaction, "update-transaction")),
        Some((Endpoint::DeleteTransaction, "delete-transaction")),
    );
    Resource {
        item: transaction,
        links,
    }
}

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    input: CreateTransactionRequest,
) -> ApiResponse<Resource<Transaction>> {
    recover("create_transaction", create_inner(state, user, input).await)
}

async fn create_inner(
    state: &AppState,
    user: &AuthUser,
    input: CreateTransactionRequest,
) -> ServiceResult<Resource<Transaction>> {
    tracing::info!(
        account_id = %input.account_id,
        amount = %input.amount,
        transaction_type = %input.transaction_type,
        "Creating transaction"
    );

    if state
        .repos
        .accounts
        .find_by_id(&input.account_id)
        .await?
        .is_none()
    {
        tracing::warn!(account_id = %input.account_id, "Transaction for unknown account rejected");
        return Ok(ApiResponse::bad_request(Some(ACCOUNT_MISSING)));
    }

    let adjustment =
        BalanceAdjustment::posting(&input.account_id, input.transaction_type, input.amount);
    let new_transaction = NewTransaction {
        account_id: input.account_id,
        description: input.description,
        amount: input.amount,
        transaction_date: input.transaction_date,
        transaction_type: input.transaction_type,
        created_by: user.user_name.clone(),
    };

    match state
        .repos
        .transactions
        .create(&new_transaction, &adjustment)
        .await?
    {
        Some(transaction) => Ok(ApiResponse::created(resource(state, transaction))),
        None => {
            // The account vanished between the lookup and the write.
            tracing::warn!(account_id = %new_transaction.account_id, "Transaction posting rolled back");
            Ok(not_persisted("Transaction"))
        }
    }
}

/// Answers 202 on success.
pub async fn update(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    input: UpdateTransactionRequest,
) -> ApiResponse<Resource<Transaction>> {
    recover("update_transaction", update_inner(state, user, id, input).await)
}

async fn update_inner(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    input: UpdateTransactionRequest,
) -> ServiceResult<Resource<Transaction>> {
    tracing::info!(transaction_id = id, user_id = %user.user_id, "Updating transaction");

    if let Some(account_id) = &input.account_id {
        if state.repos.accounts.find_by_id(account_id).await?.is_none() {
            return Ok(ApiResponse::not_found(Some(ACCOUNT_MISSING)));
        }
    }

    let Some(mut transaction) = state.repos.transactions.find_by_id(id).await? else {
        return Ok(ApiResponse::not_found(Some("Transaction not found")));
    };

    let old_account = transaction.account_id.clone();
    let old_kind = transaction.transaction_type;
    let old_amount = transaction.amount;

    if let Some(account_id) = input.account_id {
        transaction.account_id = account_id;
    }
    if let Some(description) = input.description {
        transaction.description = description;
    }
    if let Some(amount) = input.amount {
        transaction.amount = amount;
    }
    if let Some(transaction_date) = input.transaction_date {
        transaction.transaction_date = transaction_date;
    }
    if let Some(transaction_type) = input.transaction_type {
        transaction.transaction_type = transaction_type;
    }
    transaction.updated_by = Some(user.user_name.clone());
    transaction.updated_at = Some(Utc::now());

    let adjustments = repost(
        &old_account,
        old_kind,
        old_amount,
        &transaction.account_id,
        transaction.transaction_type,
        transaction.amount,
    );

    match state
        .repos
        .transactions
        .update(&transaction, &adjustments)
        .await?
    {
        Some(transaction) => Ok(ApiResponse::accepted(resource(state, transaction))),
        None => Ok(not_persisted("Transaction")),
    }
}

pub async fn get(state: &AppState, id: &str) -> ApiResponse<Resource<Transaction>> {
    recover("get_transaction", get_inner(state, id).await)
}

async fn get_inner(state: &AppState, id: &str) -> ServiceResult<Resource<Transaction>> {
    Ok(match state.repos.transactions.find_by_id(id).await? {
        Some(transaction) => ApiResponse::ok(resource(state, transaction)),
        None => ApiResponse::not_found(Some("Transaction not found")),
    })
}

pub async fn delete(state: &AppState, user: &AuthUser, id: &str) -> ApiResponse<Transaction> {
    recover("delete_transaction", delete_inner(state, user, id).await)
}

async fn delete_inner(state: &AppState, user: &AuthUser, id: &str) -> ServiceResult<Transaction> {
    tracing::info!(transaction_id = id, user_id = %user.user_id, "Deleting transaction");

    let Some(transaction) = state.repos.transactions.find_by_id(id).await? else {
        return Ok(ApiResponse::not_found(Some("Transaction not found")));
    };

    let reversal = BalanceAdjustment::reversal(
        &transaction.account_id,
        transaction.transaction_type,
        transaction.amount,
    );

    if state
        .repos
        .transactions
        .delete(id, &reversal, &user.user_name)
        .await?
    {
        Ok(ApiResponse::ok(transaction))
    } else {
        Ok(not_persisted("Transaction"))
    }
}

pub async fn list(
    state: &AppState,
    params: &TransactionListParams,
) -> ApiResponse<PagedList<Resource<Transaction>>> {
    recover("list_transactions", list_inner(state, params).await)
}

async fn list_inner(
    state: &AppState,
    params: &TransactionListParams,
) -> ServiceResult<PagedList<Resource<Transaction>>> {
    let request = params.page_request();
    let page = state
        .repos
        .transactions
        .list(&params.filter(), &request)
        .await?
        .map(|transaction| resource(state, transaction));

    let mut list = PagedList::from_page(page, &request);
    list.links = state.links.page_links(
        Endpoint::ListTransactions,
        &list,
        &request,
        &params.link_filters(),
    );
    Ok(ApiResponse::ok(list))
}
