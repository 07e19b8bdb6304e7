//! Push request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pushhub_core::error::AppError;
use pushhub_core::result::AppResult;
use pushhub_core::types::entity::EntityReference;
use pushhub_core::types::user::UserIdentifier;

use super::priority::PushRequestPriority;
use crate::payload::PushPayload;

/// Maximum length of [`PushRequest::name`].
pub const MAX_NAME_LENGTH: usize = 512;
/// Maximum length of the serialized payload body (4 MiB).
pub const MAX_DATA_LENGTH: usize = 4 * 1024 * 1024;
/// Maximum length of the entity type name.
pub const MAX_ENTITY_TYPE_NAME_LENGTH: usize = 512;
/// Maximum length of the serialized entity id.
pub const MAX_ENTITY_ID_LENGTH: usize = 256;
/// Maximum length of a comma-joined user identifier list (2 MiB).
pub const MAX_USER_IDS_LENGTH: usize = 2 * 1024 * 1024;
/// Maximum length of the comma-joined tenant id list (1 MiB).
pub const MAX_TENANT_IDS_LENGTH: usize = 1024 * 1024;
/// Maximum length of [`PushRequest::last_execution_result`] (4 MiB).
pub const MAX_LAST_EXECUTION_RESULT_LENGTH: usize = 4 * 1024 * 1024;

/// Sentinel value of [`PushRequest::tenant_ids`] meaning "all tenants".
pub const ALL_TENANT_IDS: &str = "0";
/// Token representing the host (tenant-less) partition in a tenant id list.
pub const HOST_TENANT_TOKEN: &str = "null";

/// Tenant targeting scope of a push request, derived from its stored
/// `tenant_ids` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantScope {
    /// Deliver to subscribers of every tenant.
    AllTenants,
    /// Deliver to subscribers of the listed tenants only. `None` entries
    /// address the host partition.
    Tenants(Vec<Option<i32>>),
}

/// A stored unit of outbound push work.
///
/// Push requests live only in the host partition. A request targets either
/// an explicit user list (`user_ids`) or the subscribers of one or more
/// tenants (`tenant_ids`); the two are mutually exclusive. Requests are
/// created by the publisher and deleted by the distributor after a fully
/// successful delivery pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// Unique push request type name.
    pub name: String,
    /// Optional tagged payload delivered to providers.
    pub data: Option<PushPayload>,
    /// Entity scoping, if this is an entity-level push request.
    pub entity: Option<EntityReference>,
    /// Explicit target users as a comma-joined identifier list.
    /// When set, it overrides subscription-based targeting.
    pub user_ids: Option<String>,
    /// Users excluded from the final recipient set, comma-joined.
    pub excluded_user_ids: Option<String>,
    /// Target tenants, comma-joined. `"0"` means all tenants; the token
    /// `"null"` names the host partition. Only meaningful when `user_ids`
    /// is empty.
    pub tenant_ids: Option<String>,
    /// Processing priority.
    pub priority: PushRequestPriority,
    /// Optional expiration time.
    pub expiration_time: Option<DateTime<Utc>>,
    /// Number of failed distribution attempts.
    pub failed_count: i32,
    /// Maximum failed attempts before the request is abandoned.
    pub max_failed_count: Option<i32>,
    /// When the request was last processed.
    pub last_execution_time: Option<DateTime<Utc>>,
    /// Outcome description of the last processing attempt.
    pub last_execution_result: Option<String>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
}

impl PushRequest {
    /// Create a new push request with the given id and name.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            data: None,
            entity: None,
            user_ids: None,
            excluded_user_ids: None,
            tenant_ids: None,
            priority: PushRequestPriority::Normal,
            expiration_time: None,
            failed_count: 0,
            max_failed_count: None,
            last_execution_time: None,
            last_execution_result: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the request targets an explicit user list.
    pub fn has_explicit_users(&self) -> bool {
        self.user_ids
            .as_deref()
            .map(|ids| !ids.trim().is_empty())
            .unwrap_or(false)
    }

    /// Parse the explicit target user list. Empty when `user_ids` is unset.
    pub fn target_users(&self) -> AppResult<Vec<UserIdentifier>> {
        match self.user_ids.as_deref() {
            Some(ids) => UserIdentifier::parse_list(ids),
            None => Ok(Vec::new()),
        }
    }

    /// Parse the excluded user list. Empty when `excluded_user_ids` is unset.
    pub fn excluded_users(&self) -> AppResult<Vec<UserIdentifier>> {
        match self.excluded_user_ids.as_deref() {
            Some(ids) => UserIdentifier::parse_list(ids),
            None => Ok(Vec::new()),
        }
    }

    /// Derive the tenant targeting scope from the stored tenant id list.
    ///
    /// An unset, blank, or `"0"` list means all tenants.
    pub fn tenant_scope(&self) -> AppResult<TenantScope> {
        let raw = match self.tenant_ids.as_deref().map(str::trim) {
            None | Some("") => return Ok(TenantScope::AllTenants),
            Some(raw) => raw,
        };
        if raw == ALL_TENANT_IDS {
            return Ok(TenantScope::AllTenants);
        }
        Ok(TenantScope::Tenants(parse_tenant_ids(raw)?))
    }

    /// Whether the request has passed its expiration time.
    pub fn is_expired(&self) -> bool {
        self.expiration_time
            .map(|exp| exp <= Utc::now())
            .unwrap_or(false)
    }
}

/// Encode a tenant id list into the comma-joined storage form.
///
/// Host-partition entries (`None`) are written as the `"null"` token.
pub fn encode_tenant_ids(tenant_ids: &[Option<i32>]) -> String {
    tenant_ids
        .iter()
        .map(|tenant_id| match tenant_id {
            Some(id) => id.to_string(),
            None => HOST_TENANT_TOKEN.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-joined tenant id list from its storage form.
pub fn parse_tenant_ids(joined: &str) -> AppResult<Vec<Option<i32>>> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if part.eq_ignore_ascii_case(HOST_TENANT_TOKEN) {
                Ok(None)
            } else {
                part.parse::<i32>().map(Some).map_err(|_| {
                    AppError::validation(format!("Invalid tenant id '{part}' in tenant id list"))
                })
            }
        })
        .collect()
}
