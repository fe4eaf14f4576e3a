//! Account operations.

use chrono::Utc;
use fintrack_core::money::AccountType;
use fintrack_core::pagination::PagedList;
use fintrack_core::validation::{non_negative, not_blank};
use fintrack_db::models::account::{Account, AccountChanges, NewAccount};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::{not_persisted, recover, ServiceResult};
use crate::links::Endpoint;
use crate::middleware::auth::AuthUser;
use crate::query::AccountListParams;
use crate::response::{ApiResponse, Resource};
use crate::state::AppState;

const DUPLICATE_ACCOUNT: &str = "You already have an account with the same name and type";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "non_negative"))]
    pub balance: Option<Decimal>,
    pub account_type: AccountType,
}

/// Every field is optional; absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub balance: Option<Decimal>,
    pub account_type: Option<AccountType>,
}

fn resource(state: &AppState, account: Account) -> Resource<Account> {
    let links = state.links.resource_links(
        &account.id,
        Endpoint::GetAccount,
        Some((Endpoint::UpdateAccount, "update-account")),
        Some((Endpoint::DeleteAccount, "delete-account")),
    );
    Resource {
        item: account,
        links,
    }
}

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    input: CreateAccountRequest,
) -> ApiResponse<Resource<Account>> {
    recover("create_account", create_inner(state, user, input).await)
}

async fn create_inner(
    state: &AppState,
    user: &AuthUser,
    input: CreateAccountRequest,
) -> ServiceResult<Resource<Account>> {
    let name = input.name.trim().to_string();
    tracing::info!(user_id = %user.user_id, name = %name, account_type = %input.account_type, "Creating account");

    if state
        .repos
        .accounts
        .exists(&user.user_id, &name, input.account_type)
        .await?
    {
        tracing::warn!(user_id = %user.user_id, name = %name, "Duplicate account rejected");
        return Ok(ApiResponse::bad_request(Some(DUPLICATE_ACCOUNT)));
    }

    let new_account = NewAccount {
        user_id: user.user_id.clone(),
        name,
        balance: input.balance.unwrap_or(Decimal::ZERO),
        account_type: input.account_type,
        created_by: user.user_name.clone(),
    };

    match state.repos.accounts.create(&new_account).await? {
        Some(account) => Ok(ApiResponse::created(resource(state, account))),
        None => {
            tracing::warn!(user_id = %user.user_id, "Account insert affected no rows");
            Ok(not_persisted("Account"))
        }
    }
}

pub async fn update(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    input: UpdateAccountRequest,
) -> ApiResponse<Resource<Account>> {
    recover("update_account", update_inner(state, user, id, input).await)
}

async fn update_inner(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    input: UpdateAccountRequest,
) -> ServiceResult<Resource<Account>> {
    tracing::info!(account_id = id, user_id = %user.user_id, "Updating account");

    let Some(account) = state.repos.accounts.find_by_id(id).await? else {
        return Ok(ApiResponse::not_found(Some("Account not found")));
    };

    let name = input
        .name
        .map(|n| n.trim().to_string())
        .unwrap_or_else(|| account.name.clone());
    let account_type = input.account_type.unwrap_or(account.account_type);

    if (name != account.name || account_type != account.account_type)
        && state
            .repos
            .accounts
            .exists(&account.user_id, &name, account_type)
            .await?
    {
        tracing::warn!(account_id = id, name = %name, "Account update would duplicate another account");
        return Ok(ApiResponse::bad_request(Some(DUPLICATE_ACCOUNT)));
    }

    let changes = AccountChanges {
        name,
        account_type,
        balance: input.balance,
        updated_by: user.user_name.clone(),
        updated_at: Utc::now(),
    };

    match state.repos.accounts.update(id, &changes).await? {
        Some(account) => Ok(ApiResponse::ok(resource(state, account))),
        None => Ok(not_persisted("Account")),
    }
}

pub async fn get(state: &AppState, id: &str) -> ApiResponse<Resource<Account>> {
    recover("get_account", get_inner(state, id).await)
}

async fn get_inner(state: &AppState, id: &str) -> ServiceResult<Resource<Account>> {
    Ok(match state.repos.accounts.find_by_id(id).await? {
        Some(account) => ApiResponse::ok(resource(state, account)),
        None => ApiResponse::not_found(Some("Account not found")),
    })
}

/// Deleting an account also removes its transactions.
pub async fn delete(state: &AppState, user: &AuthUser, id: &str) -> ApiResponse<Account> {
    recover("delete_account", delete_inner(state, user, id).await)
}

async fn delete_inner(state: &AppState, user: &AuthUser, id: &str) -> ServiceResult<Account> {
    tracing::info!(account_id = id, user_id = %user.user_id, "Deleting account");

    let Some(account) = state.repos.accounts.find_by_id(id).await? else {
        return Ok(ApiResponse::not_found(Some("Account not found")));
    };

    if state.repos.accounts.delete(id).await? {
        Ok(ApiResponse::ok(account))
    } else {
        Ok(not_persisted("Account"))
    }
}

pub async fn list(
    state: &AppState,
    params: &AccountListParams,
) -> ApiResponse<PagedList<Resource<Account>>> {
    recover("list_accounts", list_inner(state, params).await)
}

async fn list_inner(
    state: &AppState,
    params: &AccountListParams,
) -> ServiceResult<PagedList<Resource<Account>>> {
    let request = params.page_request();
    let page = state
        .repos
        .accounts
        .list(&params.filter(), &request)
        .await?
        .map(|account| resource(state, account));

    let mut list = PagedList::from_page(page, &request);
    list.links = state.links.page_links(
        Endpoint::ListAccounts,
        &list,
        &request,
        &params.link_filters(),
    );
    Ok(ApiResponse::ok(list))
}
