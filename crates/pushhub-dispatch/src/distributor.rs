//! Push request distribution orchestration.

use std::sync::Arc;

use uuid::Uuid;

use pushhub_core::result::AppResult;
use pushhub_core::types::user::UserIdentifier;
use pushhub_entity::request::PushRequest;
use pushhub_store::PushRequestStore;

use crate::provider::ProviderDispatcher;
use crate::resolver::SubscriptionResolver;

/// Runs one distribution attempt for a stored push request.
///
/// The read-resolve-deliver-delete sequence is not atomic: a crash after
/// delivery but before deletion causes redelivery on the next attempt.
/// At-most-once completion relies on the store's delete being idempotent
/// and on the job queue not double-enqueueing.
pub struct PushRequestDistributor {
    store: Arc<dyn PushRequestStore>,
    resolver: SubscriptionResolver,
    dispatcher: ProviderDispatcher,
}

impl PushRequestDistributor {
    /// Create a distributor over the given collaborators.
    pub fn new(
        store: Arc<dyn PushRequestStore>,
        resolver: SubscriptionResolver,
        dispatcher: ProviderDispatcher,
    ) -> Self {
        Self {
            store,
            resolver,
            dispatcher,
        }
    }

    /// Distribute a push request to all configured providers and delete it
    /// from the store on success.
    ///
    /// A missing request id is a benign no-op (another worker may already
    /// have completed it). Delivery and configuration failures are logged
    /// and leave the request in the store for an external retry; they are
    /// never surfaced to the caller.
    pub async fn distribute(&self, push_request_id: Uuid) -> AppResult<()> {
        // Push requests live only in the host partition; no tenant filter
        // applies to this read.
        let Some(request) = self.store.get_request(push_request_id).await? else {
            tracing::warn!(
                "Distribution can not continue: push request {} not found",
                push_request_id
            );
            return Ok(());
        };

        let recipients = self.resolver.resolve(&request).await?;
        if recipients.is_empty() {
            tracing::warn!(
                "Push request {} ('{}') does not have any target user",
                request.id,
                request.name
            );
        }

        if let Err(error) = self.deliver_and_delete(&recipients, &request).await {
            tracing::warn!(
                "Distribution of push request {} failed, request kept for retry: {}",
                request.id,
                error
            );
        }

        Ok(())
    }

    async fn deliver_and_delete(
        &self,
        recipients: &[UserIdentifier],
        request: &PushRequest,
    ) -> AppResult<()> {
        self.dispatcher.dispatch(recipients, request).await?;
        self.store.delete_request(request.id).await
    }
}

impl std::fmt::Debug for PushRequestDistributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushRequestDistributor").finish_non_exhaustive()
    }
}
