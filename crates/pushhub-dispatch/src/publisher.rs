//! Push request publishing.

use std::sync::Arc;

use uuid::Uuid;

use pushhub_core::config::push::PushConfig;
use pushhub_core::error::AppError;
use pushhub_core::result::AppResult;
use pushhub_core::traits::jobs::{BackgroundJobQueue, DistributionJobArgs};
use pushhub_core::traits::session::CurrentSession;
use pushhub_core::types::entity::EntityReference;
use pushhub_core::types::user::UserIdentifier;
use pushhub_entity::payload::PushPayload;
use pushhub_entity::request::model::{
    encode_tenant_ids, MAX_DATA_LENGTH, MAX_ENTITY_ID_LENGTH, MAX_ENTITY_TYPE_NAME_LENGTH,
    MAX_NAME_LENGTH, MAX_TENANT_IDS_LENGTH, MAX_USER_IDS_LENGTH,
};
use pushhub_entity::request::{PushRequest, PushRequestPriority};
use pushhub_store::PushRequestStore;

use crate::distributor::PushRequestDistributor;

/// Optional parameters of a publish call.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Tagged payload delivered to providers.
    pub data: Option<PushPayload>,
    /// Entity scoping for entity-level push requests.
    pub entity: Option<EntityReference>,
    /// Processing priority.
    pub priority: PushRequestPriority,
    /// Explicit target users. Mutually exclusive with `tenant_ids`.
    pub user_ids: Vec<UserIdentifier>,
    /// Users excluded from the final recipient set.
    pub excluded_user_ids: Vec<UserIdentifier>,
    /// Target tenants for subscription-based delivery. `None` entries
    /// address the host partition. When neither `user_ids` nor
    /// `tenant_ids` is given, the request is scoped to the current
    /// session's tenant.
    pub tenant_ids: Option<Vec<Option<i32>>>,
}

/// Validates, persists, and routes new push requests.
///
/// Small explicitly-targeted requests are distributed inline so they skip
/// background-job latency; everything else is handed to the job queue to
/// protect the publishing caller from large fan-outs.
pub struct PushRequestPublisher {
    store: Arc<dyn PushRequestStore>,
    queue: Arc<dyn BackgroundJobQueue>,
    distributor: Arc<PushRequestDistributor>,
    session: Arc<dyn CurrentSession>,
    config: PushConfig,
}

impl PushRequestPublisher {
    /// Create a publisher over the given collaborators.
    pub fn new(
        store: Arc<dyn PushRequestStore>,
        queue: Arc<dyn BackgroundJobQueue>,
        distributor: Arc<PushRequestDistributor>,
        session: Arc<dyn CurrentSession>,
        config: PushConfig,
    ) -> Self {
        Self {
            store,
            queue,
            distributor,
            session,
            config,
        }
    }

    /// Publish a push request and return its id.
    ///
    /// Validation failures are returned to the caller and nothing is
    /// persisted. On success the request is durably stored before the
    /// distribution decision is made.
    pub async fn publish(&self, name: &str, options: PublishOptions) -> AppResult<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Push request name can not be empty"));
        }
        if name.len() > MAX_NAME_LENGTH {
            return Err(AppError::validation(format!(
                "Push request name exceeds {MAX_NAME_LENGTH} characters"
            )));
        }

        let has_users = !options.user_ids.is_empty();
        let has_tenants = options
            .tenant_ids
            .as_ref()
            .map(|ids| !ids.is_empty())
            .unwrap_or(false);
        if has_users && has_tenants {
            return Err(AppError::validation(
                "tenant_ids can be set only if user_ids is not set",
            ));
        }

        // Default to the caller's tenant when no explicit target is named.
        let tenant_ids = if !has_users && !has_tenants {
            Some(vec![self.session.tenant_id()])
        } else if has_users {
            None
        } else {
            options.tenant_ids
        };

        if let Some(data) = options.data.as_ref() {
            if data.body.to_string().len() > MAX_DATA_LENGTH {
                return Err(AppError::validation(format!(
                    "Push request data exceeds {MAX_DATA_LENGTH} bytes"
                )));
            }
        }
        if let Some(entity) = options.entity.as_ref() {
            if entity.type_name.len() > MAX_ENTITY_TYPE_NAME_LENGTH {
                return Err(AppError::validation(format!(
                    "Entity type name exceeds {MAX_ENTITY_TYPE_NAME_LENGTH} characters"
                )));
            }
            if entity.entity_id.len() > MAX_ENTITY_ID_LENGTH {
                return Err(AppError::validation(format!(
                    "Entity id exceeds {MAX_ENTITY_ID_LENGTH} characters"
                )));
            }
        }

        let mut request = PushRequest::new(Uuid::new_v4(), name);
        request.data = options.data;
        request.entity = options.entity;
        request.priority = options.priority;
        request.user_ids = if has_users {
            Some(UserIdentifier::join_list(&options.user_ids))
        } else {
            None
        };
        request.excluded_user_ids = if options.excluded_user_ids.is_empty() {
            None
        } else {
            Some(UserIdentifier::join_list(&options.excluded_user_ids))
        };
        request.tenant_ids = tenant_ids.as_deref().map(encode_tenant_ids);

        if request.user_ids.as_deref().map(str::len).unwrap_or(0) > MAX_USER_IDS_LENGTH
            || request
                .excluded_user_ids
                .as_deref()
                .map(str::len)
                .unwrap_or(0)
                > MAX_USER_IDS_LENGTH
        {
            return Err(AppError::validation(format!(
                "User id list exceeds {MAX_USER_IDS_LENGTH} bytes"
            )));
        }
        if request.tenant_ids.as_deref().map(str::len).unwrap_or(0) > MAX_TENANT_IDS_LENGTH {
            return Err(AppError::validation(format!(
                "Tenant id list exceeds {MAX_TENANT_IDS_LENGTH} bytes"
            )));
        }

        let request_id = request.id;
        self.store.insert_request(request).await?;

        if has_users
            && options.user_ids.len() <= self.config.max_user_count_for_foreground_distribution
        {
            // Few enough receivers to distribute within the publish call.
            self.distributor.distribute(request_id).await?;
        } else {
            // Distribution may take a long time; offload to a worker.
            self.queue
                .enqueue(DistributionJobArgs::new(request_id))
                .await?;
            tracing::debug!(
                "Enqueued distribution job for push request {} ('{}')",
                request_id,
                name
            );
        }

        Ok(request_id)
    }
}

impl std::fmt::Debug for PushRequestPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushRequestPublisher").finish_non_exhaustive()
    }
}
