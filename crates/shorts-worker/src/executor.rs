//! Job executor.
//!
//! Accepts job submissions, bounds how many run at once and turns
//! pipeline errors into terminal `failed` statuses. Cancellation and
//! the whole-job timeout are reported with a `cancelled:` prefix so
//! pollers can tell them from genuine processing failures.

use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tracing::{info, Instrument};

use shorts_media::FfmpegRunner;
use shorts_models::{Job, JobConfig, JobId};
use shorts_speech::Transcriber;

use crate::config::WorkerConfig;
use crate::logging::JobLogger;
use crate::pipeline::{run_job, PipelineContext};
use crate::store::JobStore;

pub struct JobExecutor {
    ctx: Arc<PipelineContext>,
    job_semaphore: Arc<Semaphore>,
    shutdown_tx: watch::Sender<bool>,
}

impl JobExecutor {
    /// Create an executor with its own store and FFmpeg runner.
    pub fn new(config: WorkerConfig, transcriber: Arc<dyn Transcriber>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let runner = FfmpegRunner::new()
            .with_timeout(config.ffmpeg_timeout_secs)
            .with_cancel(shutdown_rx);

        let job_semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));

        let ctx = Arc::new(PipelineContext {
            config,
            store: JobStore::new(),
            runner,
            transcriber,
        });

        Self {
            ctx,
            job_semaphore,
            shutdown_tx,
        }
    }

    /// Handle to the shared job store.
    pub fn store(&self) -> JobStore {
        self.ctx.store.clone()
    }

    /// Register a job and schedule it. Returns immediately with the
    /// job ID; progress is observed through the store.
    pub async fn submit(&self, config: JobConfig) -> JobId {
        let job = Job::new(config);
        let id = job.id.clone();
        self.ctx.store.insert(job).await;
        info!(job_id = %id, "Job submitted");

        let ctx = self.ctx.clone();
        let semaphore = self.job_semaphore.clone();
        let job_id = id.clone();

        tokio::spawn(async move {
            let logger = JobLogger::new(&job_id, "process_job");

            let permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    logger.log_error("worker shutting down before the job ran");
                    ctx.store
                        .fail(&job_id, "cancelled: worker shutting down")
                        .await;
                    return;
                }
            };

            let timeout = ctx.config.job_timeout;
            let run = run_job(&ctx, &job_id).instrument(logger.create_span());
            match tokio::time::timeout(timeout, run).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    let message = if e.is_cancellation() {
                        format!("cancelled: {}", e)
                    } else {
                        e.to_string()
                    };
                    logger.log_error(&message);
                    ctx.store.fail(&job_id, message).await;
                }
                Err(_) => {
                    let message =
                        format!("cancelled: job timed out after {}s", timeout.as_secs());
                    logger.log_error(&message);
                    ctx.store.fail(&job_id, message).await;
                }
            }

            drop(permit);
        });

        id
    }

    /// Signal every in-flight FFmpeg invocation to stop and refuse any
    /// job still waiting for a slot.
    pub fn shutdown(&self) {
        info!("Executor shutting down");
        self.job_semaphore.close();
        let _ = self.shutdown_tx.send(true);
    }
}
