//! FFmpeg CLI wrapper for the shorts pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A runner with timeout and cancellation support
//! - FFprobe duration/stream probing
//! - The clip operations: cut, upscale, concat, audio extraction,
//!   subtitle burn-in

pub mod audio;
pub mod burnin;
pub mod clip;
pub mod command;
pub mod error;
pub mod probe;

pub use audio::extract_audio;
pub use burnin::{burn_subtitles, escape_filter_path};
pub use clip::{concat_clips, cut_clip, upscale_to_4k, UPSCALE_HEIGHT, UPSCALE_WIDTH};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
