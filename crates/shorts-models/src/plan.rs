//! Clip segmentation planning.
//!
//! `plan_clips` is a pure function from the probed video duration and the
//! job configuration to an ordered cut plan. It never touches the
//! filesystem; the orchestrator decides what a plan means for job status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::job::{JobConfig, SegmentationMode};
use crate::timestamp::{parse_time_string, TimestampError};

/// Default auto-mode window length in seconds.
pub const DEFAULT_CLIP_SECS: f64 = 60.0;

/// A trailing auto-mode remainder shorter than this is dropped.
pub const MIN_TAIL_SECS: f64 = 5.0;

/// One planned cut window. Invariant: `end > start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSpec {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// 1-based clip number, increasing in temporal order
    pub index: usize,
}

/// Planner output.
///
/// Merge mode is distinguished from a plain clip sequence: its ranges are
/// intermediate cuts that reduce to a single output clip, not independent
/// clips.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipPlan {
    /// Independent output clips (auto or manual mode)
    Clips(Vec<ClipSpec>),
    /// Sub-segments to concatenate into one output clip
    Merge(Vec<(f64, f64)>),
}

impl ClipPlan {
    /// Number of output clips this plan produces.
    pub fn output_count(&self) -> usize {
        match self {
            ClipPlan::Clips(specs) => specs.len(),
            ClipPlan::Merge(_) => 1,
        }
    }

    /// True if the plan produces no output at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, ClipPlan::Clips(specs) if specs.is_empty())
    }
}

/// Planning error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid time string: {0}")]
    Timestamp(#[from] TimestampError),

    #[error("clip duration must be positive, got {0}")]
    NonPositiveClipDuration(f64),

    #[error("manual mode requires a start/end range")]
    MissingManualRange,

    #[error("merge mode requires at least one segment")]
    EmptyMergeSet,

    #[error("merge segment end ({end}s) must be after start ({start}s)")]
    InvalidMergeRange { start: f64, end: f64 },
}

/// Compute the cut plan for a job.
pub fn plan_clips(video_duration: f64, config: &JobConfig) -> Result<ClipPlan, PlanError> {
    match config.mode {
        SegmentationMode::Auto => plan_auto(video_duration, config.clip_duration),
        SegmentationMode::Manual => plan_manual(config),
        SegmentationMode::Merge => plan_merge(config),
    }
}

/// Partition `[0, duration)` into fixed-length windows.
///
/// A window is emitted whenever its start is strictly below the video
/// duration, with its end clamped to the duration. Only the trailing
/// remainder is subject to the minimum-length rule; interior windows are
/// always kept.
fn plan_auto(video_duration: f64, clip_duration: f64) -> Result<ClipPlan, PlanError> {
    if clip_duration <= 0.0 {
        return Err(PlanError::NonPositiveClipDuration(clip_duration));
    }

    let mut specs = Vec::new();
    let mut i = 0usize;
    loop {
        let start = i as f64 * clip_duration;
        if start >= video_duration {
            break;
        }
        let end = (start + clip_duration).min(video_duration);
        specs.push(ClipSpec {
            start,
            end,
            index: specs.len() + 1,
        });
        i += 1;
    }

    if let Some(last) = specs.last() {
        if last.end - last.start < MIN_TAIL_SECS {
            specs.pop();
        }
    }

    Ok(ClipPlan::Clips(specs))
}

/// One clip from the configured range, or no clips if the range is empty.
fn plan_manual(config: &JobConfig) -> Result<ClipPlan, PlanError> {
    let range = config
        .manual_range
        .as_ref()
        .ok_or(PlanError::MissingManualRange)?;

    let start = parse_time_string(&range.start)?;
    let end = parse_time_string(&range.end)?;

    if end > start {
        Ok(ClipPlan::Clips(vec![ClipSpec {
            start,
            end,
            index: 1,
        }]))
    } else {
        Ok(ClipPlan::Clips(Vec::new()))
    }
}

/// Parse every merge segment; an empty or inverted segment set fails fast.
fn plan_merge(config: &JobConfig) -> Result<ClipPlan, PlanError> {
    if config.merge_ranges.is_empty() {
        return Err(PlanError::EmptyMergeSet);
    }

    let mut ranges = Vec::with_capacity(config.merge_ranges.len());
    for range in &config.merge_ranges {
        let start = parse_time_string(&range.start)?;
        let end = parse_time_string(&range.end)?;
        if end <= start {
            return Err(PlanError::InvalidMergeRange { start, end });
        }
        ranges.push((start, end));
    }

    Ok(ClipPlan::Merge(ranges))
}
