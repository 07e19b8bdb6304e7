//! Subscription management.

use std::sync::Arc;

use uuid::Uuid;

use pushhub_core::result::AppResult;
use pushhub_core::types::entity::EntityReference;
use pushhub_core::types::paging::Paging;
use pushhub_core::types::user::UserIdentifier;
use pushhub_entity::subscription::PushRequestSubscription;
use pushhub_store::PushRequestStore;

use crate::definitions::PushDefinitionRegistry;

/// Manages user subscriptions to push request types.
pub struct PushSubscriptionManager {
    store: Arc<dyn PushRequestStore>,
    definitions: Arc<PushDefinitionRegistry>,
}

impl PushSubscriptionManager {
    /// Create a manager over the given store and definition registry.
    pub fn new(store: Arc<dyn PushRequestStore>, definitions: Arc<PushDefinitionRegistry>) -> Self {
        Self { store, definitions }
    }

    /// Subscribe a user to a push request type.
    ///
    /// Subscribing twice to the same (name, entity) pair is a no-op, so at
    /// most one active subscription exists per tuple.
    pub async fn subscribe(
        &self,
        user: UserIdentifier,
        push_request_name: &str,
        entity: Option<EntityReference>,
    ) -> AppResult<()> {
        if self
            .store
            .is_subscribed(user, push_request_name, entity.as_ref())
            .await?
        {
            return Ok(());
        }
        tracing::debug!(
            "Subscribing user {} to push request '{}'",
            user,
            push_request_name
        );
        self.store
            .insert_subscription(PushRequestSubscription::new(
                Uuid::new_v4(),
                user,
                push_request_name,
                entity,
            ))
            .await
    }

    /// Subscribe a user to every available general (non-entity) push
    /// request type.
    pub async fn subscribe_to_all_available(&self, user: UserIdentifier) -> AppResult<()> {
        for definition in self.definitions.all_available(user).await? {
            if definition.entity_type_name.is_some() {
                continue;
            }
            self.subscribe(user, &definition.name, None).await?;
        }
        Ok(())
    }

    /// Remove a user's subscription to the (name, entity) pair. Removing a
    /// missing subscription is a no-op.
    pub async fn unsubscribe(
        &self,
        user: UserIdentifier,
        push_request_name: &str,
        entity: Option<&EntityReference>,
    ) -> AppResult<()> {
        self.store
            .delete_subscription(user, push_request_name, entity)
            .await
    }

    /// All subscriptions to a push request type, across every tenant.
    pub async fn subscriptions(
        &self,
        push_request_name: &str,
        entity: Option<&EntityReference>,
        paging: Paging,
    ) -> AppResult<Vec<PushRequestSubscription>> {
        self.store
            .subscriptions(push_request_name, entity, paging)
            .await
    }

    /// Subscriptions to a push request type within one tenant partition.
    pub async fn subscriptions_of_tenant(
        &self,
        tenant_id: Option<i32>,
        push_request_name: &str,
        entity: Option<&EntityReference>,
        paging: Paging,
    ) -> AppResult<Vec<PushRequestSubscription>> {
        self.store
            .subscriptions_of_tenants(&[tenant_id], push_request_name, entity, paging)
            .await
    }

    /// Every subscription held by a user.
    pub async fn subscribed_requests(
        &self,
        user: UserIdentifier,
        paging: Paging,
    ) -> AppResult<Vec<PushRequestSubscription>> {
        self.store.user_subscriptions(user, paging).await
    }

    /// Whether a user is subscribed to the (name, entity) pair.
    pub async fn is_subscribed(
        &self,
        user: UserIdentifier,
        push_request_name: &str,
        entity: Option<&EntityReference>,
    ) -> AppResult<bool> {
        self.store
            .is_subscribed(user, push_request_name, entity)
            .await
    }
}

impl std::fmt::Debug for PushSubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushSubscriptionManager").finish_non_exhaustive()
    }
}
