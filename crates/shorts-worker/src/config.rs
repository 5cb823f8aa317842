//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use shorts_speech::ChunkPolicy;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum concurrent jobs
    pub max_concurrent_jobs: usize,
    /// Whole-job timeout; a job exceeding it is failed as cancelled
    pub job_timeout: Duration,
    /// Timeout for a single FFmpeg invocation, in seconds
    pub ffmpeg_timeout_secs: u64,
    /// Directory for transient files (merge parts)
    pub work_dir: PathBuf,
    /// Directory for finished clips
    pub output_dir: PathBuf,
    /// Caption chunking thresholds
    pub chunk_policy: ChunkPolicy,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 2,
            job_timeout: Duration::from_secs(3600),
            ffmpeg_timeout_secs: 1800,
            work_dir: PathBuf::from("/tmp/shorts/work"),
            output_dir: PathBuf::from("/tmp/shorts/output"),
            chunk_policy: ChunkPolicy::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let default_policy = ChunkPolicy::default();

        Self {
            max_concurrent_jobs: env_parse("WORKER_MAX_JOBS", defaults.max_concurrent_jobs),
            job_timeout: Duration::from_secs(env_parse("WORKER_JOB_TIMEOUT", 3600)),
            ffmpeg_timeout_secs: env_parse("WORKER_FFMPEG_TIMEOUT", defaults.ffmpeg_timeout_secs),
            work_dir: std::env::var("WORKER_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("WORKER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            chunk_policy: ChunkPolicy {
                max_words: env_parse("CAPTION_MAX_WORDS", default_policy.max_words),
                max_chunk_secs: env_parse("CAPTION_MAX_CHUNK_SECS", default_policy.max_chunk_secs),
                max_gap_secs: env_parse("CAPTION_MAX_GAP_SECS", default_policy.max_gap_secs),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
