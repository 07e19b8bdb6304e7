//! Permission and feature gating.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::user::UserIdentifier;

/// Checks whether a user holds a named permission.
#[async_trait]
pub trait PermissionChecker: Send + Sync + 'static {
    /// Returns `true` when the user is granted the permission.
    async fn is_granted(&self, permission: &str, user: UserIdentifier) -> AppResult<bool>;
}

/// Checks whether a named feature is enabled for a tenant.
#[async_trait]
pub trait FeatureChecker: Send + Sync + 'static {
    /// Returns `true` when the feature is enabled for the tenant.
    /// Host-side users (`tenant_id = None`) are not feature-gated.
    async fn is_enabled(&self, feature: &str, tenant_id: Option<i32>) -> AppResult<bool>;
}
