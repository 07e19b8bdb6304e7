//! Recipient set computation.
//!
//! Resolves a push request into the final, exclusion-filtered, deduplicated
//! list of user identifiers handed to the providers.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use pushhub_core::result::AppResult;
use pushhub_core::traits::settings::{setting_names, SettingLookup};
use pushhub_core::types::paging::Paging;
use pushhub_core::types::user::UserIdentifier;
use pushhub_entity::request::{PushRequest, TenantScope};
use pushhub_entity::subscription::PushRequestSubscription;
use pushhub_store::PushRequestStore;

use crate::definitions::PushDefinitionRegistry;

/// Computes the effective recipients of a push request.
pub struct SubscriptionResolver {
    store: Arc<dyn PushRequestStore>,
    definitions: Arc<PushDefinitionRegistry>,
    settings: Arc<dyn SettingLookup>,
}

impl SubscriptionResolver {
    /// Create a resolver over the given collaborators.
    pub fn new(
        store: Arc<dyn PushRequestStore>,
        definitions: Arc<PushDefinitionRegistry>,
        settings: Arc<dyn SettingLookup>,
    ) -> Self {
        Self {
            store,
            definitions,
            settings,
        }
    }

    /// Resolve the recipient set of a request.
    ///
    /// Explicitly targeted requests use the request's own user list;
    /// otherwise recipients are derived from subscriptions within the
    /// request's tenant scope, gated by definition availability and the
    /// per-user receive setting. The exclusion list is applied uniformly
    /// at the end in both cases, and the result is deduplicated by
    /// (tenant, user) identity. No ordering is guaranteed.
    pub async fn resolve(&self, request: &PushRequest) -> AppResult<Vec<UserIdentifier>> {
        let mut recipients = if request.has_explicit_users() {
            self.resolve_explicit(request).await?
        } else {
            self.resolve_subscribed(request).await?
        };

        let excluded: HashSet<UserIdentifier> = request.excluded_users()?.into_iter().collect();
        if !excluded.is_empty() {
            recipients.retain(|user| !excluded.contains(user));
        }

        Ok(recipients)
    }

    async fn resolve_explicit(&self, request: &PushRequest) -> AppResult<Vec<UserIdentifier>> {
        let mut seen = HashSet::new();
        let mut recipients = Vec::new();
        for user in request.target_users()? {
            if !seen.insert(user) {
                continue;
            }
            if self.receive_enabled(user).await? {
                recipients.push(user);
            }
        }
        Ok(recipients)
    }

    async fn resolve_subscribed(&self, request: &PushRequest) -> AppResult<Vec<UserIdentifier>> {
        let subscriptions = match request.tenant_scope()? {
            TenantScope::AllTenants => {
                self.store
                    .subscriptions(&request.name, request.entity.as_ref(), Paging::all())
                    .await?
            }
            TenantScope::Tenants(tenant_ids) => {
                self.store
                    .subscriptions_of_tenants(
                        &tenant_ids,
                        &request.name,
                        request.entity.as_ref(),
                        Paging::all(),
                    )
                    .await?
            }
        };

        // Group by tenant so availability/setting checks run per partition.
        let mut groups: BTreeMap<Option<i32>, Vec<PushRequestSubscription>> = BTreeMap::new();
        for subscription in subscriptions {
            groups
                .entry(subscription.tenant_id)
                .or_default()
                .push(subscription);
        }

        let mut seen = HashSet::new();
        let mut recipients = Vec::new();
        for (_tenant_id, group) in groups {
            for subscription in group {
                let user = subscription.user();
                if !seen.insert(user) {
                    continue;
                }
                if !self
                    .definitions
                    .is_available(&request.name, user)
                    .await?
                {
                    tracing::debug!(
                        "Dropping subscriber {} of push request '{}': definition not available",
                        user,
                        request.name
                    );
                    continue;
                }
                if !self.receive_enabled(user).await? {
                    tracing::debug!(
                        "Dropping subscriber {} of push request '{}': receive setting disabled",
                        user,
                        request.name
                    );
                    continue;
                }
                recipients.push(user);
            }
        }
        Ok(recipients)
    }

    async fn receive_enabled(&self, user: UserIdentifier) -> AppResult<bool> {
        self.settings
            .get_user_setting(setting_names::RECEIVE, user.tenant_id, user.user_id)
            .await
    }
}

impl std::fmt::Debug for SubscriptionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionResolver").finish_non_exhaustive()
    }
}
