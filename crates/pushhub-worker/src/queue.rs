//! In-memory distribution job queue.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use pushhub_core::result::AppResult;
use pushhub_core::traits::jobs::{BackgroundJobQueue, DistributionJobArgs};

/// FIFO job queue backed by process memory.
///
/// Jobs do not survive a restart; a crashed process leaves its undelivered
/// push requests in the store, where an operator can re-publish or purge
/// them. Suitable for single-process deployments and tests.
#[derive(Debug, Default)]
pub struct MemoryJobQueue {
    jobs: Mutex<VecDeque<DistributionJobArgs>>,
    notify: Notify,
}

impl MemoryJobQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until a job is available and take it.
    pub async fn dequeue(&self) -> DistributionJobArgs {
        loop {
            // Register interest before re-checking to avoid losing a wakeup
            // between the check and the wait.
            let notified = self.notify.notified();
            if let Some(args) = self.jobs.lock().await.pop_front() {
                return args;
            }
            notified.await;
        }
    }

    /// Take the next job without waiting, or `None` when the queue is empty.
    pub async fn try_dequeue(&self) -> Option<DistributionJobArgs> {
        self.jobs.lock().await.pop_front()
    }

    /// Number of queued jobs.
    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    /// Whether the queue is empty.
    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }
}

#[async_trait]
impl BackgroundJobQueue for MemoryJobQueue {
    async fn enqueue(&self, args: DistributionJobArgs) -> AppResult<()> {
        self.jobs.lock().await.push_back(args);
        self.notify.notify_one();
        tracing::debug!(
            "Enqueued distribution job for push request {}",
            args.push_request_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = MemoryJobQueue::new();
        let first = DistributionJobArgs::new(Uuid::new_v4());
        let second = DistributionJobArgs::new(Uuid::new_v4());

        queue.enqueue(first).await.unwrap();
        queue.enqueue(second).await.unwrap();

        assert_eq!(queue.len().await, 2);
        assert_eq!(queue.try_dequeue().await, Some(first));
        assert_eq!(queue.try_dequeue().await, Some(second));
        assert_eq!(queue.try_dequeue().await, None);
    }

    #[tokio::test]
    async fn test_dequeue_waits_for_enqueue() {
        let queue = std::sync::Arc::new(MemoryJobQueue::new());
        let args = DistributionJobArgs::new(Uuid::new_v4());

        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.dequeue().await })
        };

        tokio::task::yield_now().await;
        queue.enqueue(args).await.unwrap();

        assert_eq!(waiter.await.unwrap(), args);
        assert!(queue.is_empty().await);
    }
}
