//! Error types for speech operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for speech operations.
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Errors that can occur during transcription and caption handling.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech engine '{0}' not found in PATH")]
    EngineNotFound(String),

    #[error("Speech engine failed: {message}")]
    EngineFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Speech engine produced no transcript at {0}")]
    MissingTranscript(PathBuf),

    #[error("Malformed SRT at line {line}: {message}")]
    SrtParse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl SpeechError {
    pub fn engine_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::EngineFailed {
            message: message.into(),
            stderr,
        }
    }

    pub fn srt_parse(line: usize, message: impl Into<String>) -> Self {
        Self::SrtParse {
            line,
            message: message.into(),
        }
    }
}
