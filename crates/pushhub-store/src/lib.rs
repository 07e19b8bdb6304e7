//! # pushhub-store
//!
//! The [`PushRequestStore`] persistence contract consumed by the dispatch
//! layer, plus a thread-safe in-memory reference implementation backed by
//! concurrent maps with per-tenant subscription partitions.
//!
//! A persistent implementation is expected to rely on its storage engine's
//! transactional isolation; each trait operation is a single logical
//! transaction.

pub mod memory;
pub mod store;

pub use memory::MemoryPushRequestStore;
pub use store::PushRequestStore;
