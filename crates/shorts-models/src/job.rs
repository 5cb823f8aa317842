//! Job configuration and the job status record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

use crate::plan::DEFAULT_CLIP_SECS;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the source video is segmented into clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationMode {
    /// Fixed-length windows across the whole video
    #[default]
    Auto,
    /// A single caller-supplied time range
    Manual,
    /// Several sub-ranges concatenated into one clip
    Merge,
}

/// A start/end time-string pair (`MM:SS` or `HH:MM:SS`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Job submission payload. Immutable once the job starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Path to the source video
    pub video_path: PathBuf,

    /// Segmentation mode
    #[serde(default)]
    pub mode: SegmentationMode,

    /// Target clip length in seconds for auto mode
    #[serde(default = "default_clip_duration")]
    pub clip_duration: f64,

    /// Burn speech captions into each clip
    #[serde(default)]
    pub captions: bool,

    /// Upscale each clip to 4K before captioning
    #[serde(default)]
    pub enhance_4k: bool,

    /// Cut range for manual mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_range: Option<TimeRange>,

    /// Sub-ranges for merge mode
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merge_ranges: Vec<TimeRange>,
}

fn default_clip_duration() -> f64 {
    DEFAULT_CLIP_SECS
}

impl JobConfig {
    /// Create a default auto-mode config for a source video.
    pub fn auto(video_path: impl Into<PathBuf>) -> Self {
        Self {
            video_path: video_path.into(),
            mode: SegmentationMode::Auto,
            clip_duration: DEFAULT_CLIP_SECS,
            captions: false,
            enhance_4k: false,
            manual_range: None,
            merge_ranges: Vec::new(),
        }
    }
}

/// Externally observable job state.
///
/// The progress variants render with the 1-based clip index so pollers
/// see e.g. `cutting_2/3`, `upscaling_2`, `transcribing_2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    /// Waiting for the worker to pick the job up
    #[default]
    Queued,
    /// Job accepted, planning cuts
    Processing,
    /// Cutting clip `current` of `total`
    Cutting { current: usize, total: usize },
    /// Upscaling clip `current`
    Upscaling { current: usize },
    /// Transcribing and captioning clip `current`
    Transcribing { current: usize },
    /// All clips produced
    Completed,
    /// Aborted with an error
    Failed,
}

impl JobStatus {
    /// Check if this is a terminal state (no more transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Cutting { current, total } => write!(f, "cutting_{}/{}", current, total),
            JobStatus::Upscaling { current } => write!(f, "upscaling_{}", current),
            JobStatus::Transcribing { current } => write!(f, "transcribing_{}", current),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => return Ok(JobStatus::Queued),
            "processing" => return Ok(JobStatus::Processing),
            "completed" => return Ok(JobStatus::Completed),
            "failed" => return Ok(JobStatus::Failed),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("cutting_") {
            if let Some((current, total)) = rest.split_once('/') {
                if let (Ok(current), Ok(total)) = (current.parse(), total.parse()) {
                    return Ok(JobStatus::Cutting { current, total });
                }
            }
        }
        if let Some(rest) = s.strip_prefix("upscaling_") {
            if let Ok(current) = rest.parse() {
                return Ok(JobStatus::Upscaling { current });
            }
        }
        if let Some(rest) = s.strip_prefix("transcribing_") {
            if let Ok(current) = rest.parse() {
                return Ok(JobStatus::Transcribing { current });
            }
        }

        Err(format!("unknown job status: {}", s))
    }
}

impl Serialize for JobStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A job record, created at submission and mutated only by the
/// orchestrator task that owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Submission payload
    pub config: JobConfig,

    /// Current status
    #[serde(default)]
    pub status: JobStatus,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Final clip paths, in clip order
    #[serde(default)]
    pub output_files: Vec<PathBuf>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new queued job.
    pub fn new(config: JobConfig) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            config,
            status: JobStatus::Queued,
            error: None,
            output_files: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the status and bump the updated_at timestamp.
    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Record one finished clip path.
    pub fn push_output(&mut self, path: PathBuf) {
        self.output_files.push(path);
        self.updated_at = Utc::now();
    }

    /// Mark the job as completed.
    pub fn complete(&mut self) {
        self.status = JobStatus::Completed;
        self.updated_at = Utc::now();
    }

    /// Mark the job as failed with a message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.updated_at = Utc::now();
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
