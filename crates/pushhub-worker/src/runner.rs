//! Distribution worker — main loop that drains the job queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use pushhub_core::config::worker::WorkerConfig;
use pushhub_dispatch::PushRequestDistributor;

use crate::queue::MemoryJobQueue;

/// Background worker that executes queued distribution jobs.
///
/// Jobs run concurrently up to the configured limit. A failing distribution
/// is logged and dropped; the push request itself stays in the store, so an
/// operator can re-enqueue it.
#[derive(Debug)]
pub struct DistributionWorker {
    queue: Arc<MemoryJobQueue>,
    distributor: Arc<PushRequestDistributor>,
    config: WorkerConfig,
}

impl DistributionWorker {
    /// Create a worker over the given queue and distributor.
    pub fn new(
        queue: Arc<MemoryJobQueue>,
        distributor: Arc<PushRequestDistributor>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            queue,
            distributor,
            config,
        }
    }

    /// Run the worker until the cancel signal flips to `true`.
    ///
    /// On shutdown the worker stops taking new jobs and waits (bounded) for
    /// in-flight distributions to finish.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        if !self.config.enabled {
            tracing::info!("Distribution worker is disabled");
            return;
        }

        tracing::info!(
            "Distribution worker started with concurrency={}, poll_interval={}ms",
            self.config.concurrency,
            self.config.poll_interval_ms
        );

        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.concurrency));
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!("Distribution worker received shutdown signal");
                        break;
                    }
                }
                drained = self.poll_and_execute(&semaphore) => {
                    if drained {
                        continue;
                    }
                    tokio::select! {
                        _ = cancel.changed() => {
                            if *cancel.borrow() {
                                tracing::info!("Distribution worker shutting down");
                                break;
                            }
                        }
                        _ = time::sleep(poll_interval) => {}
                    }
                }
            }
        }

        tracing::info!("Distribution worker waiting for in-flight jobs to complete...");

        let max_permits = self.config.concurrency as u32;
        let _ = time::timeout(Duration::from_secs(30), semaphore.acquire_many(max_permits)).await;

        tracing::info!("Distribution worker shut down complete");
    }

    /// Take one job and spawn its distribution. Returns whether a job was
    /// started, so the caller can poll again immediately.
    async fn poll_and_execute(&self, semaphore: &Arc<tokio::sync::Semaphore>) -> bool {
        let permit = match semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::trace!("All worker slots occupied, waiting...");
                return false;
            }
        };

        let Some(args) = self.queue.try_dequeue().await else {
            drop(permit);
            tracing::trace!("No distribution jobs queued");
            return false;
        };

        let distributor = Arc::clone(&self.distributor);
        tokio::spawn(async move {
            let _permit = permit;
            tracing::debug!(
                "Processing distribution job for push request {}",
                args.push_request_id
            );
            if let Err(error) = distributor.distribute(args.push_request_id).await {
                tracing::error!(
                    "Distribution job for push request {} failed: {}",
                    args.push_request_id,
                    error
                );
            }
        });
        true
    }
}
