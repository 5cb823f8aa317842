//! In-memory job store.
//!
//! Shared between the submission side and the pipeline tasks. Reads
//! return cloned snapshots so callers never hold the lock across an
//! await point.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use shorts_models::{Job, JobId, JobStatus};

/// Concurrency-safe map of job records keyed by job ID.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job record. Overwrites any record with the same ID.
    pub async fn insert(&self, job: Job) {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id.clone(), job);
    }

    /// Snapshot of a job record, or `None` for an unknown ID.
    pub async fn get(&self, id: &JobId) -> Option<Job> {
        let jobs = self.jobs.read().await;
        jobs.get(id).cloned()
    }

    /// Current status of a job, or `None` for an unknown ID.
    pub async fn status(&self, id: &JobId) -> Option<JobStatus> {
        let jobs = self.jobs.read().await;
        jobs.get(id).map(|job| job.status)
    }

    /// Publish a status transition. Unknown IDs are ignored.
    pub async fn set_status(&self, id: &JobId, status: JobStatus) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            info!(job_id = %id, status = %status, "Job status updated");
            job.set_status(status);
        }
    }

    /// Append a finished clip path to a job's output list.
    pub async fn push_output(&self, id: &JobId, path: PathBuf) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            job.push_output(path);
        }
    }

    /// Mark a job completed.
    pub async fn complete(&self, id: &JobId) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            info!(job_id = %id, "Job completed");
            job.complete();
        }
    }

    /// Mark a job failed with an error message.
    pub async fn fail(&self, id: &JobId, error: impl Into<String>) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(id) {
            let error = error.into();
            info!(job_id = %id, error = %error, "Job failed");
            job.fail(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::JobConfig;

    #[tokio::test]
    async fn test_insert_and_get_snapshot() {
        let store = JobStore::new();
        let job = Job::new(JobConfig::auto("/tmp/in.mp4"));
        let id = job.id.clone();
        store.insert(job).await;

        let snapshot = store.get(&id).await.unwrap();
        assert_eq!(snapshot.status, JobStatus::Queued);

        // Snapshots are detached from the store
        store.set_status(&id, JobStatus::Processing).await;
        assert_eq!(snapshot.status, JobStatus::Queued);
        assert_eq!(store.status(&id).await, Some(JobStatus::Processing));
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let store = JobStore::new();
        let id = JobId::new();
        assert!(store.get(&id).await.is_none());
        assert!(store.status(&id).await.is_none());
        // Mutations on unknown IDs are no-ops
        store.set_status(&id, JobStatus::Processing).await;
        store.fail(&id, "nope").await;
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_status_sequence() {
        let store = JobStore::new();
        let job = Job::new(JobConfig::auto("/tmp/in.mp4"));
        let id = job.id.clone();
        store.insert(job).await;

        store.set_status(&id, JobStatus::Processing).await;
        store
            .set_status(
                &id,
                JobStatus::Cutting {
                    current: 1,
                    total: 2,
                },
            )
            .await;
        store.push_output(&id, "/tmp/out/clip_1.mp4".into()).await;
        store.complete(&id).await;

        let job = store.get(&id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.output_files, vec![PathBuf::from("/tmp/out/clip_1.mp4")]);
    }
}
