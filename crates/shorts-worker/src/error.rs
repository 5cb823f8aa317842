//! Worker error types.

use thiserror::Error;

use shorts_media::MediaError;
use shorts_models::PlanError;
use shorts_speech::SpeechError;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    /// Whether this error came from an external call being cancelled or
    /// timed out rather than genuinely failing.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            WorkerError::Media(MediaError::Cancelled) | WorkerError::Media(MediaError::Timeout(_))
        )
    }
}
