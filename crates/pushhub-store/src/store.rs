//! Push request store contract.

use async_trait::async_trait;
use uuid::Uuid;

use pushhub_core::result::AppResult;
use pushhub_core::types::entity::EntityReference;
use pushhub_core::types::paging::Paging;
use pushhub_core::types::user::UserIdentifier;
use pushhub_entity::request::{PushRequest, PushRequestPriority};
use pushhub_entity::subscription::PushRequestSubscription;

/// Persistence contract for push requests and subscriptions.
///
/// All operations are asynchronous and fail with a storage-kind error.
/// Push requests live in the host partition only; subscriptions are
/// partitioned by tenant.
#[async_trait]
pub trait PushRequestStore: Send + Sync + 'static {
    /// Insert a push request.
    async fn insert_request(&self, request: PushRequest) -> AppResult<()>;

    /// Get a push request by id, or `None` when it does not exist.
    async fn get_request(&self, request_id: Uuid) -> AppResult<Option<PushRequest>>;

    /// List push requests, optionally filtered by priority.
    async fn requests(
        &self,
        priority: Option<PushRequestPriority>,
        paging: Paging,
    ) -> AppResult<Vec<PushRequest>>;

    /// Count push requests, optionally filtered by priority.
    async fn request_count(&self, priority: Option<PushRequestPriority>) -> AppResult<u64>;

    /// Update the priority of a stored push request.
    async fn update_request_priority(
        &self,
        request_id: Uuid,
        priority: PushRequestPriority,
    ) -> AppResult<()>;

    /// Delete a push request. Deleting a missing request is a no-op.
    async fn delete_request(&self, request_id: Uuid) -> AppResult<()>;

    /// Insert a subscription.
    async fn insert_subscription(&self, subscription: PushRequestSubscription) -> AppResult<()>;

    /// Delete every subscription matching the (user, name, entity) tuple.
    async fn delete_subscription(
        &self,
        user: UserIdentifier,
        push_request_name: &str,
        entity: Option<&EntityReference>,
    ) -> AppResult<()>;

    /// Get subscriptions to a push request type across all tenants.
    async fn subscriptions(
        &self,
        push_request_name: &str,
        entity: Option<&EntityReference>,
        paging: Paging,
    ) -> AppResult<Vec<PushRequestSubscription>>;

    /// Get subscriptions to a push request type restricted to the listed
    /// tenants (`None` entries address the host partition).
    async fn subscriptions_of_tenants(
        &self,
        tenant_ids: &[Option<i32>],
        push_request_name: &str,
        entity: Option<&EntityReference>,
        paging: Paging,
    ) -> AppResult<Vec<PushRequestSubscription>>;

    /// Get every subscription held by a user.
    async fn user_subscriptions(
        &self,
        user: UserIdentifier,
        paging: Paging,
    ) -> AppResult<Vec<PushRequestSubscription>>;

    /// Whether a user is subscribed to the (name, entity) pair.
    async fn is_subscribed(
        &self,
        user: UserIdentifier,
        push_request_name: &str,
        entity: Option<&EntityReference>,
    ) -> AppResult<bool>;
}
