//! In-memory push request store.
//!
//! Thread-safe reference implementation used by tests and by hosts that do
//! not need durable storage. Requests live in a single concurrent map;
//! subscriptions are kept in one concurrent map per tenant partition so
//! concurrent distribution workers do not contend across tenants.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use pushhub_core::error::AppError;
use pushhub_core::result::AppResult;
use pushhub_core::types::entity::EntityReference;
use pushhub_core::types::paging::Paging;
use pushhub_core::types::user::UserIdentifier;
use pushhub_entity::request::{PushRequest, PushRequestPriority};
use pushhub_entity::subscription::PushRequestSubscription;

use crate::store::PushRequestStore;

/// Concurrent in-memory implementation of [`PushRequestStore`].
#[derive(Debug, Default)]
pub struct MemoryPushRequestStore {
    /// Push requests, host partition only.
    requests: DashMap<Uuid, PushRequest>,
    /// Subscriptions partitioned by tenant.
    subscriptions: DashMap<Option<i32>, DashMap<Uuid, PushRequestSubscription>>,
}

impl MemoryPushRequestStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_partition(
        partition: &DashMap<Uuid, PushRequestSubscription>,
        push_request_name: &str,
        entity: Option<&EntityReference>,
        out: &mut Vec<PushRequestSubscription>,
    ) {
        for entry in partition.iter() {
            if entry.value().matches_request(push_request_name, entity) {
                out.push(entry.value().clone());
            }
        }
    }

    fn page(mut rows: Vec<PushRequestSubscription>, paging: Paging) -> Vec<PushRequestSubscription> {
        // Stable order so paged reads do not jump around between calls.
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        rows.into_iter().skip(paging.skip).take(paging.take).collect()
    }
}

#[async_trait]
impl PushRequestStore for MemoryPushRequestStore {
    async fn insert_request(&self, request: PushRequest) -> AppResult<()> {
        let request_id = request.id;
        if self.requests.insert(request_id, request).is_some() {
            return Err(AppError::storage(format!(
                "Push request {request_id} already exists"
            )));
        }
        Ok(())
    }

    async fn get_request(&self, request_id: Uuid) -> AppResult<Option<PushRequest>> {
        Ok(self
            .requests
            .get(&request_id)
            .map(|entry| entry.value().clone()))
    }

    async fn requests(
        &self,
        priority: Option<PushRequestPriority>,
        paging: Paging,
    ) -> AppResult<Vec<PushRequest>> {
        let mut rows: Vec<PushRequest> = self
            .requests
            .iter()
            .filter(|entry| priority.map_or(true, |p| entry.value().priority == p))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows.into_iter().skip(paging.skip).take(paging.take).collect())
    }

    async fn request_count(&self, priority: Option<PushRequestPriority>) -> AppResult<u64> {
        let count = self
            .requests
            .iter()
            .filter(|entry| priority.map_or(true, |p| entry.value().priority == p))
            .count();
        Ok(count as u64)
    }

    async fn update_request_priority(
        &self,
        request_id: Uuid,
        priority: PushRequestPriority,
    ) -> AppResult<()> {
        match self.requests.get_mut(&request_id) {
            Some(mut entry) => {
                entry.priority = priority;
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Push request {request_id} does not exist"
            ))),
        }
    }

    async fn delete_request(&self, request_id: Uuid) -> AppResult<()> {
        self.requests.remove(&request_id);
        Ok(())
    }

    async fn insert_subscription(&self, subscription: PushRequestSubscription) -> AppResult<()> {
        let partition = self
            .subscriptions
            .entry(subscription.tenant_id)
            .or_default();
        let subscription_id = subscription.id;
        if partition.insert(subscription_id, subscription).is_some() {
            return Err(AppError::storage(format!(
                "Subscription {subscription_id} already exists"
            )));
        }
        Ok(())
    }

    async fn delete_subscription(
        &self,
        user: UserIdentifier,
        push_request_name: &str,
        entity: Option<&EntityReference>,
    ) -> AppResult<()> {
        if let Some(partition) = self.subscriptions.get(&user.tenant_id) {
            partition.retain(|_, subscription| {
                !subscription.matches(user, push_request_name, entity)
            });
        }
        Ok(())
    }

    async fn subscriptions(
        &self,
        push_request_name: &str,
        entity: Option<&EntityReference>,
        paging: Paging,
    ) -> AppResult<Vec<PushRequestSubscription>> {
        let mut rows = Vec::new();
        for partition in self.subscriptions.iter() {
            Self::collect_partition(partition.value(), push_request_name, entity, &mut rows);
        }
        Ok(Self::page(rows, paging))
    }

    async fn subscriptions_of_tenants(
        &self,
        tenant_ids: &[Option<i32>],
        push_request_name: &str,
        entity: Option<&EntityReference>,
        paging: Paging,
    ) -> AppResult<Vec<PushRequestSubscription>> {
        let mut rows = Vec::new();
        for tenant_id in tenant_ids {
            if let Some(partition) = self.subscriptions.get(tenant_id) {
                Self::collect_partition(partition.value(), push_request_name, entity, &mut rows);
            }
        }
        Ok(Self::page(rows, paging))
    }

    async fn user_subscriptions(
        &self,
        user: UserIdentifier,
        paging: Paging,
    ) -> AppResult<Vec<PushRequestSubscription>> {
        let mut rows = Vec::new();
        if let Some(partition) = self.subscriptions.get(&user.tenant_id) {
            for entry in partition.iter() {
                if entry.value().user_id == user.user_id {
                    rows.push(entry.value().clone());
                }
            }
        }
        Ok(Self::page(rows, paging))
    }

    async fn is_subscribed(
        &self,
        user: UserIdentifier,
        push_request_name: &str,
        entity: Option<&EntityReference>,
    ) -> AppResult<bool> {
        let Some(partition) = self.subscriptions.get(&user.tenant_id) else {
            return Ok(false);
        };
        Ok(partition
            .iter()
            .any(|entry| entry.value().matches(user, push_request_name, entity)))
    }
}
