//! Per-user setting lookup.

use async_trait::async_trait;

use crate::result::AppResult;

/// Well-known setting names used by the push system.
pub mod setting_names {
    /// Top-level switch to enable/disable receiving pushes for a user.
    pub const RECEIVE: &str = "push.receive";
}

/// Looks up boolean user settings in the hosting application.
#[async_trait]
pub trait SettingLookup: Send + Sync + 'static {
    /// Get the value of a boolean setting for a user, falling back to the
    /// setting's default when the user has no explicit value.
    async fn get_user_setting(
        &self,
        name: &str,
        tenant_id: Option<i32>,
        user_id: i64,
    ) -> AppResult<bool>;
}
