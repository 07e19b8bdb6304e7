//! Push request subscription entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pushhub_core::types::entity::EntityReference;
use pushhub_core::types::user::UserIdentifier;

/// A standing opt-in of one user to a named push request type, optionally
/// scoped to a single entity instance.
///
/// At most one active subscription exists per
/// (tenant, user, request name, entity) tuple; the subscription manager
/// checks before inserting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushRequestSubscription {
    /// Unique subscription identifier.
    pub id: Uuid,
    /// Tenant of the subscribed user. `None` means the host partition.
    pub tenant_id: Option<i32>,
    /// The subscribed user.
    pub user_id: i64,
    /// Name of the subscribed push request type.
    pub push_request_name: String,
    /// Entity scoping, if this is an entity-level subscription.
    pub entity: Option<EntityReference>,
    /// When the subscription was created.
    pub created_at: DateTime<Utc>,
}

impl PushRequestSubscription {
    /// Create a new subscription row.
    pub fn new(
        id: Uuid,
        user: UserIdentifier,
        push_request_name: impl Into<String>,
        entity: Option<EntityReference>,
    ) -> Self {
        Self {
            id,
            tenant_id: user.tenant_id,
            user_id: user.user_id,
            push_request_name: push_request_name.into(),
            entity,
            created_at: Utc::now(),
        }
    }

    /// The subscriber as a [`UserIdentifier`].
    pub fn user(&self) -> UserIdentifier {
        UserIdentifier::new(self.tenant_id, self.user_id)
    }

    /// Whether this row matches the given (user, name, entity) tuple by
    /// value equality.
    pub fn matches(
        &self,
        user: UserIdentifier,
        push_request_name: &str,
        entity: Option<&EntityReference>,
    ) -> bool {
        self.tenant_id == user.tenant_id
            && self.user_id == user.user_id
            && self.push_request_name == push_request_name
            && self.entity.as_ref() == entity
    }

    /// Whether this row subscribes to the given (name, entity) pair.
    pub fn matches_request(&self, push_request_name: &str, entity: Option<&EntityReference>) -> bool {
        self.push_request_name == push_request_name && self.entity.as_ref() == entity
    }
}
