//! Caption types: words, transcript segments and display chunks.

use serde::{Deserialize, Serialize};

/// A single word with speech-engine timestamps.
///
/// Words arrive ordered by `start` and non-overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// The word text
    pub text: String,
}

impl Word {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// A speech-engine native transcript segment (sentence-level granularity).
///
/// Used directly as a caption chunk when word timestamps are unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Segment text
    pub text: String,
}

/// A short on-screen caption display unit.
///
/// Chunks hold at most four words, stay on screen briefly, and never
/// overlap: chunk *n*'s start is at or after chunk *n-1*'s end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionChunk {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Display text (words joined by single spaces, trimmed)
    pub text: String,
}
