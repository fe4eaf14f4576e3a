//! Request extractors that run before a handler.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`rbac::RequireBulkAccess`] -- Requires `Administrator` or `Super Administrator`.
//! - [`validation::ValidatedJson`] -- Deserializes and validates a JSON body.
//! - [`validation::ListQuery`] -- Deserializes list query parameters.

pub mod auth;
pub mod rbac;
pub mod validation;
