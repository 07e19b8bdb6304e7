//! # pushhub-core
//!
//! Core crate for PushHub. Contains collaborator traits, configuration
//! schemas, shared value types such as [`types::user::UserIdentifier`],
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other PushHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
