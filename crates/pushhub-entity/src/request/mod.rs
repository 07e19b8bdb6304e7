//! Push request entity and priority levels.

pub mod model;
pub mod priority;

pub use model::{PushRequest, TenantScope};
pub use priority::PushRequestPriority;
