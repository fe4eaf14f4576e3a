//! Domain building blocks shared by the persistence and HTTP layers.
//!
//! Nothing in this crate performs I/O: it holds identifiers, role names,
//! money rules, pagination math, and small formatting helpers.

pub mod error;
pub mod link;
pub mod money;
pub mod pagination;
pub mod roles;
pub mod size;
pub mod types;
pub mod validation;
