//! Shared data models for the shorts pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs, job configuration and job status
//! - Clip segmentation planning
//! - Words, transcript segments and caption chunks
//! - Timestamp parsing and SRT time formatting

pub mod caption;
pub mod job;
pub mod plan;
pub mod timestamp;

// Re-export common types
pub use caption::{CaptionChunk, TranscriptSegment, Word};
pub use job::{Job, JobConfig, JobId, JobStatus, SegmentationMode, TimeRange};
pub use plan::{plan_clips, ClipPlan, ClipSpec, PlanError, DEFAULT_CLIP_SECS, MIN_TAIL_SECS};
pub use timestamp::{format_srt_time, parse_srt_time, parse_time_string, TimestampError};
