//! Shared value types used across the PushHub crates.

pub mod entity;
pub mod paging;
pub mod user;

pub use entity::EntityReference;
pub use paging::Paging;
pub use user::UserIdentifier;
