//! Job spawner implementation.

use std::any::Any;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::config::JobsConfig;
use crate::job::JobStatus;
use crate::metrics::{JOBS_ACTIVE, JOBS_FINISHED};
use crate::registry::JobRegistry;

/// Spawns and supervises one background task per job.
#[derive(Clone)]
pub struct JobSpawner {
    registry: Arc<dyn JobRegistry>,
    permits: Option<Arc<Semaphore>>,
    active: Arc<AtomicUsize>,
}

impl JobSpawner {
    pub fn new(registry: Arc<dyn JobRegistry>, config: &JobsConfig) -> Self {
        Self {
            registry,
            permits: config.limit().map(|n| Arc::new(Semaphore::new(n))),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Tasks spawned and not yet finished, including those waiting for a permit.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Run `task` in the background for `job_id`.
    ///
    /// Returns immediately. If the task panics, the job is marked as failed.
    pub fn spawn<F>(&self, job_id: String, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.active.fetch_add(1, Ordering::SeqCst);
        let registry = Arc::clone(&self.registry);
        let permits = self.permits.clone();
        let active = Arc::clone(&self.active);

        tokio::spawn(async move {
            // Held until the job task finishes.
            let _permit = match permits {
                Some(semaphore) => match semaphore.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        error!(job_id = %job_id, "Job semaphore closed; job not run");
                        registry.put(&job_id, JobStatus::error("job queue closed"));
                        active.fetch_sub(1, Ordering::SeqCst);
                        return;
                    }
                },
                None => None,
            };

            JOBS_ACTIVE.inc();
            debug!(job_id = %job_id, "Job task started");
            let outcome = tokio::spawn(task).await;
            JOBS_ACTIVE.dec();

            if let Err(e) = outcome {
                let reason = if e.is_panic() {
                    panic_message(e.into_panic())
                } else {
                    "cancelled".to_string()
                };
                error!(job_id = %job_id, "Job task aborted: {}", reason);
                JOBS_FINISHED.with_label_values(&["panicked"]).inc();
                registry.put(
                    &job_id,
                    JobStatus::error(format!("internal error: {}", reason)),
                );
            }

            active.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "job task panicked".to_string()
    }
}
