//! Row models and insert/filter DTOs, one module per table.

pub mod account;
pub mod goal;
pub mod image;
pub mod transaction;
pub mod user;
