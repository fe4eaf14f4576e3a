//! Goal operations. A goal's `currentAmount` is whatever the owner last
//! reported.

use chrono::Utc;
use fintrack_core::pagination::PagedList;
use fintrack_core::types::Timestamp;
use fintrack_core::validation::{non_negative, not_blank, positive};
use fintrack_db::models::goal::{Goal, NewGoal};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::{not_persisted, recover, ServiceResult};
use crate::links::Endpoint;
use crate::middleware::auth::AuthUser;
use crate::query::GoalListParams;
use crate::response::{ApiResponse, Resource};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "positive"))]
    pub target_amount: Decimal,
    pub target_date: Timestamp,
    #[validate(custom(function = "non_negative"))]
    pub current_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "positive"))]
    pub target_amount: Option<Decimal>,
    pub target_date: Option<Timestamp>,
    #[validate(custom(function = "non_negative"))]
    pub current_amount: Option<Decimal>,
}

fn resource(state: &AppState, goal: Goal) -> Resource<Goal> {
    let links = state.links.resource_links(
        &goal.id,
        Endpoint::GetGoal,
        Some((Endpoint::UpdateGoal, "update-goal")),
        Some((Endpoint::DeleteGoal, "delete-goal")),
    );
    Resource { item: goal, links }
}

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    input: CreateGoalRequest,
) -> ApiResponse<Resource<Goal>> {
    recover("create_goal", create_inner(state, user, input).await)
}

async fn create_inner(
    state: &AppState,
    user: &AuthUser,
    input: CreateGoalRequest,
) -> ServiceResult<Resource<Goal>> {
    tracing::info!(user_id = %user.user_id, name = %input.name, "Creating goal");

    let new_goal = NewGoal {
        user_id: user.user_id.clone(),
        name: input.name.trim().to_string(),
        target_amount: input.target_amount,
        target_date: input.target_date,
        current_amount: input.current_amount.unwrap_or(Decimal::ZERO),
        created_by: user.user_name.clone(),
    };

    match state.repos.goals.create(&new_goal).await? {
        Some(goal) => Ok(ApiResponse::created(resource(state, goal))),
        None => Ok(not_persisted("Goal")),
    }
}

pub async fn update(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    input: UpdateGoalRequest,
) -> ApiResponse<Resource<Goal>> {
    recover("update_goal", update_inner(state, user, id, input).await)
}

async fn update_inner(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    input: UpdateGoalRequest,
) -> ServiceResult<Resource<Goal>> {
    tracing::info!(goal_id = id, user_id = %user.user_id, "Updating goal");

    let Some(mut goal) = state.repos.goals.find_by_id(id).await? else {
        return Ok(ApiResponse::not_found(Some("Goal not found")));
    };

    if let Some(name) = input.name {
        goal.name = name.trim().to_string();
    }
    if let Some(target_amount) = input.target_amount {
        goal.target_amount = target_amount;
    }
    if let Some(target_date) = input.target_date {
        goal.target_date = target_date;
    }
    if let Some(current_amount) = input.current_amount {
        goal.current_amount = current_amount;
    }
    goal.updated_by = Some(user.user_name.clone());
    goal.updated_at = Some(Utc::now());

    match state.repos.goals.update(&goal).await? {
        Some(goal) => Ok(ApiResponse::ok(resource(state, goal))),
        None => Ok(not_persisted("Goal")),
    }
}

pub async fn get(state: &AppState, id: &str) -> ApiResponse<Resource<Goal>> {
    recover("get_goal", get_inner(state, id).await)
}

async fn get_inner(state: &AppState, id: &str) -> ServiceResult<Resource<Goal>> {
    Ok(match state.repos.goals.find_by_id(id).await? {
        Some(goal) => ApiResponse::ok(resource(state, goal)),
        None => ApiResponse::not_found(Some("Goal not found")),
    })
}

pub async fn delete(state: &AppState, user: &AuthUser, id: &str) -> ApiResponse<Goal> {
    recover("delete_goal", delete_inner(state, user, id).await)
}

async fn delete_inner(state: &AppState, user: &AuthUser, id: &str) -> ServiceResult<Goal> {
    tracing::info!(goal_id = id, user_id = %user.user_id, "Deleting goal");

    let Some(goal) = state.repos.goals.find_by_id(id).await? else {
        return Ok(ApiResponse::not_found(Some("Goal not found")));
    };

    if state.repos.goals.delete(id).await? {
        Ok(ApiResponse::ok(goal))
    } else {
        Ok(not_persisted("Goal"))
    }
}

pub async fn list(state: &AppState, params: &GoalListParams) -> ApiResponse<PagedList<Resource<Goal>>> {
    recover("list_goals", list_inner(state, params).await)
}

async fn list_inner(
    state: &AppState,
    params: &GoalListParams,
) -> ServiceResult<PagedList<Resource<Goal>>> {
    let request = params.page_request();
    let page = state
        .repos
        .goals
        .list(&params.filter(), &request)
        .await?
        .map(|goal| resource(state, goal));

    let mut list = PagedList::from_page(page, &request);
    list.links = state
        .links
        .page_links(Endpoint::ListGoals, &list, &request, &params.link_filters());
    Ok(ApiResponse::ok(list))
}
