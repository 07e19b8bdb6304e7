//! Background job queue contract for distribution offload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result::AppResult;

/// Arguments of a push request distribution job.
///
/// Carries only the request id; the worker reloads the request from the
/// store when the job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionJobArgs {
    /// Id of the persisted push request to distribute.
    pub push_request_id: Uuid,
}

impl DistributionJobArgs {
    /// Create job arguments for a push request.
    pub fn new(push_request_id: Uuid) -> Self {
        Self { push_request_id }
    }
}

/// Fire-and-forget queue for distribution jobs.
///
/// The queue is expected to provide at-least-once delivery to a worker;
/// PushHub itself attaches no deduplication token to a job.
#[async_trait]
pub trait BackgroundJobQueue: Send + Sync + 'static {
    /// Enqueue a distribution job.
    async fn enqueue(&self, args: DistributionJobArgs) -> AppResult<()>;
}
