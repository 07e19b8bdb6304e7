//! # pushhub-dispatch
//!
//! The push distribution core:
//! - [`definitions::PushDefinitionRegistry`] — startup-built registry of
//!   push request types with permission/feature availability checks
//! - [`resolver::SubscriptionResolver`] — computes the effective recipient
//!   set of a push request
//! - [`provider::ProviderDispatcher`] — resolves and drives the configured
//!   delivery providers
//! - [`distributor::PushRequestDistributor`] — orchestrates one
//!   distribution attempt end to end
//! - [`publisher::PushRequestPublisher`] — validates, persists, and routes
//!   new requests inline or to the background queue
//! - [`subscriptions::PushSubscriptionManager`] — subscription CRUD

pub mod definitions;
pub mod distributor;
pub mod provider;
pub mod publisher;
pub mod resolver;
pub mod subscriptions;

#[cfg(test)]
pub(crate) mod testing;

pub use definitions::{PushDefinitionProvider, PushDefinitionRegistry};
pub use distributor::PushRequestDistributor;
pub use provider::{NullPushProvider, ProviderDispatcher, ProviderRegistry, PushProvider};
pub use publisher::{PublishOptions, PushRequestPublisher};
pub use resolver::SubscriptionResolver;
pub use subscriptions::PushSubscriptionManager;
