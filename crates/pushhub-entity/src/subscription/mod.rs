//! Push request subscription entity.

pub mod model;

pub use model::PushRequestSubscription;
