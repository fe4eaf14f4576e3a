//! HTTP handlers. Each one extracts and authorizes the request, then hands
//! off to the matching function in [`crate::services`].

pub mod account;
pub mod auth;
pub mod blob;
pub mod goal;
pub mod image;
pub mod transaction;
