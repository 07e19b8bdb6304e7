//! Collaborator traits consumed by the push distribution core.
//!
//! The hosting application implements these against its own
//! settings/permission/feature/session infrastructure.

pub mod access;
pub mod jobs;
pub mod session;
pub mod settings;

pub use access::{FeatureChecker, PermissionChecker};
pub use jobs::{BackgroundJobQueue, DistributionJobArgs};
pub use session::{CurrentSession, HostSession};
pub use settings::SettingLookup;
