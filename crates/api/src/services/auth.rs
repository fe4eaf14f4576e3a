//! Registration, login, and refresh-token rotation.
//!
//! Every successful call issues a fresh access/refresh pair. The refresh
//! token is single-use: its hash is replaced on each issue, and presenting
//! anything other than the current token revokes the user's tokens.

use chrono::{Duration, Utc};
use fintrack_core::roles::{ALL_ROLES, ROLE_USER};
use fintrack_core::types::new_id;
use fintrack_db::models::user::{NewUser, User};
use fintrack_db::repositories::Repositories;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_persisted, recover, ServiceError, ServiceResult};
use crate::auth::jwt::{
    decode_expired_token, generate_access_token, generate_refresh_token, hash_refresh_token,
};
use crate::auth::password::{hash_password, verify_password};
use crate::config::DefaultAdminConfig;
use crate::response::ApiResponse;
use crate::state::AppState;

const USER_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_REFRESH: &str = "Invalid refresh token";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub user_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The (possibly expired) access token.
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Token pair handed to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Issue a new pair for `user` and record the refresh token's hash.
/// `None` when the hash could not be stored.
async fn issue_tokens(state: &AppState, user: &User) -> Result<Option<AuthResponse>, ServiceError> {
    let jwt = &state.config.jwt;
    let token = generate_access_token(user, jwt)?;
    let (refresh_token, refresh_hash) = generate_refresh_token();
    let expires_at = Utc::now() + Duration::minutes(jwt.refresh_token_expiry_mins);

    if !state
        .repos
        .users
        .set_refresh_token(&user.id, &refresh_hash, expires_at)
        .await?
    {
        return Ok(None);
    }

    Ok(Some(AuthResponse {
        token,
        refresh_token,
        expires_in: jwt.access_token_expiry_mins * 60,
    }))
}

pub async fn register(state: &AppState, input: RegisterRequest) -> ApiResponse<AuthResponse> {
    recover("register", register_inner(state, input).await)
}

async fn register_inner(state: &AppState, input: RegisterRequest) -> ServiceResult<AuthResponse> {
    tracing::info!(email = %input.email, user_name = %input.user_name, "Registering user");

    let users = &state.repos.users;
    if users.find_by_email(&input.email).await?.is_some()
        || users.find_by_user_name(&input.user_name).await?.is_some()
    {
        tracing::warn!(email = %input.email, "Registration for existing user rejected");
        return Ok(ApiResponse::bad_request(Some(USER_EXISTS)));
    }

    let new_user = NewUser {
        user_name: input.user_name,
        email: input.email,
        password_hash: hash_password(&input.password)?,
        first_name: input.first_name,
        last_name: input.last_name,
        roles: vec![ROLE_USER.to_string()],
        security_stamp: new_id(),
    };

    // A concurrent registration can still win the unique constraint.
    let Some(user) = users.create(&new_user).await? else {
        return Ok(ApiResponse::bad_request(Some(USER_EXISTS)));
    };

    Ok(match issue_tokens(state, &user).await? {
        Some(tokens) => ApiResponse::created(tokens),
        None => not_persisted("User"),
    })
}

pub async fn login(state: &AppState, input: LoginRequest) -> ApiResponse<AuthResponse> {
    recover("login", login_inner(state, input).await)
}

async fn login_inner(state: &AppState, input: LoginRequest) -> ServiceResult<AuthResponse> {
    let Some(user) = state.repos.users.find_by_email(&input.email).await? else {
        tracing::warn!(email = %input.email, "Login for unknown email");
        return Ok(ApiResponse::unauthorized(Some(INVALID_CREDENTIALS)));
    };

    if !verify_password(&input.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Login with wrong password");
        return Ok(ApiResponse::unauthorized(Some(INVALID_CREDENTIALS)));
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(match issue_tokens(state, &user).await? {
        Some(tokens) => ApiResponse::ok(tokens),
        None => not_persisted("User"),
    })
}

pub async fn refresh(state: &AppState, input: RefreshRequest) -> ApiResponse<AuthResponse> {
    recover("refresh_token", refresh_inner(state, input).await)
}

async fn refresh_inner(state: &AppState, input: RefreshRequest) -> ServiceResult<AuthResponse> {
    let Ok(claims) = decode_expired_token(&input.token, &state.config.jwt) else {
        return Ok(ApiResponse::unauthorized(Some("Invalid access token")));
    };

    let Some(user) = state.repos.users.find_by_email(&claims.email).await? else {
        return Ok(ApiResponse::unauthorized(Some(INVALID_REFRESH)));
    };

    let presented = hash_refresh_token(&input.refresh_token);
    let matches = user.refresh_token_hash.as_deref() == Some(presented.as_str())
        && user
            .refresh_token_expires_at
            .is_some_and(|expires_at| expires_at > Utc::now());

    if !matches {
        // A stale or foreign refresh token may be a replay: cut every
        // outstanding token for this user.
        tracing::warn!(user_id = %user.id, "Refresh token mismatch, revoking user tokens");
        state.repos.users.revoke_tokens(&user.id, &new_id()).await?;
        return Ok(ApiResponse::unauthorized(Some(INVALID_REFRESH)));
    }

    tracing::info!(user_id = %user.id, "Rotating tokens");
    Ok(match issue_tokens(state, &user).await? {
        Some(tokens) => ApiResponse::ok(tokens),
        None => not_persisted("User"),
    })
}

/// Create the configured administrator unless a user with that email
/// already exists.
pub async fn seed_default_admin(
    repos: &Repositories,
    admin: &DefaultAdminConfig,
) -> Result<(), ServiceError> {
    if repos.users.find_by_email(&admin.email).await?.is_some() {
        tracing::info!(email = %admin.email, "Default administrator already present");
        return Ok(());
    }

    let user_name = admin
        .email
        .split('@')
        .next()
        .unwrap_or(admin.email.as_str())
        .to_string();

    let new_user = NewUser {
        user_name,
        email: admin.email.clone(),
        password_hash: hash_password(&admin.password)?,
        first_name: admin.first_name.clone(),
        last_name: admin.last_name.clone(),
        roles: ALL_ROLES.iter().map(|r| r.to_string()).collect(),
        security_stamp: new_id(),
    };

    match repos.users.create(&new_user).await? {
        Some(user) => tracing::info!(user_id = %user.id, "Default administrator seeded"),
        None => tracing::warn!(email = %admin.email, "Default administrator was not created"),
    }
    Ok(())
}
