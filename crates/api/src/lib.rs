//! fintrack API server library.
//!
//! Exposes the building blocks (config, state, envelope, services, routes)
//! so the binary entrypoint and the integration tests assemble the exact
//! same application.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod links;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
