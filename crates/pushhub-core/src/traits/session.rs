//! Ambient caller session.

/// Exposes the tenant and user of the current caller.
///
/// The publisher consults this when a publish call names neither explicit
/// users nor tenants, in which case the request is scoped to the caller's
/// tenant.
pub trait CurrentSession: Send + Sync + 'static {
    /// Tenant of the current caller, `None` for the host side.
    fn tenant_id(&self) -> Option<i32>;

    /// User id of the current caller, if authenticated.
    fn user_id(&self) -> Option<i64>;
}

/// Null-object session representing an unauthenticated host-side caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostSession;

impl CurrentSession for HostSession {
    fn tenant_id(&self) -> Option<i32> {
        None
    }

    fn user_id(&self) -> Option<i64> {
        None
    }
}
