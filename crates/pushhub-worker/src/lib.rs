//! # pushhub-worker
//!
//! Background execution of push request distribution jobs:
//! - [`queue::MemoryJobQueue`] — in-process FIFO implementation of the
//!   job queue contract
//! - [`runner::DistributionWorker`] — poll loop that drains the queue and
//!   drives the distributor

pub mod queue;
pub mod runner;

pub use queue::MemoryJobQueue;
pub use runner::DistributionWorker;
