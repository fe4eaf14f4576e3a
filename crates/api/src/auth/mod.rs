//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- Access-token issuance/validation and refresh-token helpers.
//! - [`antiforgery`] -- Signed request tokens for form uploads.

pub mod antiforgery;
pub mod jwt;
pub mod password;
