//! Permissive null-object collaborators.

use async_trait::async_trait;

use pushhub_core::result::AppResult;
use pushhub_core::traits::access::{FeatureChecker, PermissionChecker};
use pushhub_core::traits::settings::SettingLookup;
use pushhub_core::types::user::UserIdentifier;

/// Null-object checker that grants every permission, enables every feature,
/// and answers `true` for every setting.
///
/// The default for hosts without a permission or setting system; production
/// deployments usually supply their own implementations through the
/// builder.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAccess;

#[async_trait]
impl PermissionChecker for OpenAccess {
    async fn is_granted(&self, _permission: &str, _user: UserIdentifier) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl FeatureChecker for OpenAccess {
    async fn is_enabled(&self, _feature: &str, _tenant_id: Option<i32>) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl SettingLookup for OpenAccess {
    async fn get_user_setting(
        &self,
        _name: &str,
        _tenant_id: Option<i32>,
        _user_id: i64,
    ) -> AppResult<bool> {
        Ok(true)
    }
}
