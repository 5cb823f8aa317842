//! Clip job orchestration.
//!
//! This crate drives the full pipeline per job: segmentation planning,
//! cutting (and merging), optional 4K upscaling, optional caption
//! transcription and burn-in, all while publishing status transitions to
//! the shared job store.

pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod pipeline;
pub mod store;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use logging::JobLogger;
pub use pipeline::{caption_font_size, run_job, PipelineContext};
pub use store::JobStore;
