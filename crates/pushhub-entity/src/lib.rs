//! # pushhub-entity
//!
//! Domain entity models for PushHub. Every struct in this crate represents
//! a stored row or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize`.

pub mod definition;
pub mod payload;
pub mod request;
pub mod subscription;

pub use definition::PushDefinition;
pub use payload::{PayloadRegistry, PushPayload};
pub use request::{PushRequest, PushRequestPriority, TenantScope};
pub use subscription::PushRequestSubscription;
