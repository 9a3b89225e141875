//! In-process job table.
//!
//! [`JobRegistry`] maps job ids to their current [`Job`] snapshot. It is
//! designed to be wrapped in `Arc` and shared across handlers and background
//! tasks. Every mutation happens under the write lock, so a read-modify-write
//! through [`JobRegistry::update_with`] cannot lose a concurrent update.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::job::{Job, JobPatch};
use crate::types::JobId;

pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new job with a fresh id and return a copy of it.
    pub async fn create(&self, recipient: impl Into<String>, request_text: Option<String>) -> Job {
        let mut jobs = self.jobs.write().await;
        let mut id = JobId::new_v4();
        while jobs.contains_key(&id) {
            id = JobId::new_v4();
        }
        let job = Job::new(id, recipient.into(), request_text);
        jobs.insert(id, job.clone());
        job
    }

    pub async fn get(&self, id: JobId) -> Result<Job, CoreError> {
        self.jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::UnknownJob(id))
    }

    /// Merge `patch` into the stored job. Field values are not validated.
    pub async fn update(&self, id: JobId, patch: JobPatch) -> Result<Job, CoreError> {
        self.update_with(id, |_| Ok(patch)).await
    }

    pub async fn set_notifications_enabled(
        &self,
        id: JobId,
        enabled: bool,
    ) -> Result<Job, CoreError> {
        self.update(
            id,
            JobPatch {
                notifications_enabled: Some(enabled),
                ..Default::default()
            },
        )
        .await
    }

    /// Atomically compute and apply a patch from the current job state.
    ///
    /// `f` runs while the write lock is held. If it returns an error the
    /// stored job is left untouched and the error is propagated.
    pub async fn update_with<F>(&self, id: JobId, f: F) -> Result<Job, CoreError>
    where
        F: FnOnce(&Job) -> Result<JobPatch, CoreError>,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(CoreError::UnknownJob(id))?;
        let patch = f(job)?;
        patch.apply(job);
        Ok(job.clone())
    }

    /// All jobs, oldest first.
    pub async fn list(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by_key(|job| job.created_at);
        jobs
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
