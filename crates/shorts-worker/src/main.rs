//! Clip worker binary.
//!
//! Reads one or more job config JSON files from the command line,
//! submits them and waits for every job to reach a terminal state.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shorts_models::{JobConfig, JobId};
use shorts_speech::WhisperTranscriber;
use shorts_worker::{JobExecutor, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting shorts-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    // Surface missing tools at startup; jobs would fail on them anyway.
    if let Err(e) = shorts_media::check_ffmpeg() {
        warn!("{}", e);
    }
    if let Err(e) = shorts_media::check_ffprobe() {
        warn!("{}", e);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        error!("Usage: shorts-worker <job-config.json>...");
        std::process::exit(2);
    }

    let transcriber = Arc::new(WhisperTranscriber::from_env());
    let executor = JobExecutor::new(config, transcriber);

    let mut job_ids = Vec::new();
    for path in &args {
        let config = match load_job_config(path).await {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load job config {}: {}", path, e);
                std::process::exit(2);
            }
        };
        let id = executor.submit(config).await;
        info!(job_id = %id, "Submitted job from {}", path);
        job_ids.push(id);
    }

    let failed = tokio::select! {
        failed = wait_for_jobs(&executor, &job_ids) => failed,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            executor.shutdown();
            wait_for_jobs(&executor, &job_ids).await
        }
    };

    for id in &job_ids {
        if let Some(job) = executor.store().get(id).await {
            info!(
                job_id = %id,
                status = %job.status,
                outputs = job.output_files.len(),
                error = job.error.as_deref().unwrap_or(""),
                "Job finished"
            );
        }
    }

    info!("Worker shutdown complete");
    if failed > 0 {
        std::process::exit(1);
    }
}

fn init_tracing() {
    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("shorts=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

async fn load_job_config(path: &str) -> anyhow::Result<JobConfig> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Poll the store until every job is terminal; returns how many failed.
async fn wait_for_jobs(executor: &JobExecutor, job_ids: &[JobId]) -> usize {
    let store = executor.store();
    loop {
        let mut failed = 0;
        let mut pending = 0;
        for id in job_ids {
            match store.get(id).await {
                Some(job) if job.is_terminal() => {
                    if job.error.is_some() {
                        failed += 1;
                    }
                }
                _ => pending += 1,
            }
        }
        if pending == 0 {
            return failed;
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}
