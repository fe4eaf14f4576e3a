//! User entity model and DTOs.

use std::collections::BTreeMap;

use fintrack_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and refresh token hash. Never serialize this
/// to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    /// Extra claims copied into every access token.
    pub claims: Json<BTreeMap<String, String>>,
    /// Rotated to invalidate every access token issued so far.
    pub security_stamp: String,
    pub refresh_token_hash: Option<String>,
    pub refresh_token_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    pub security_stamp: String,
}
