//! Clip operations: cut, upscale, concat.

use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Upscale target resolution.
pub const UPSCALE_WIDTH: u32 = 3840;
/// Upscale target resolution.
pub const UPSCALE_HEIGHT: u32 = 2160;

const VIDEO_CODEC: &str = "libx264";
const PRESET: &str = "veryfast";
const CUT_CRF: u8 = 23;
const UPSCALE_CRF: u8 = 20;
const AUDIO_CODEC: &str = "aac";

/// Cut `[start_secs, end_secs)` out of a video, re-encoding for
/// compatibility with downstream filters and concatenation.
pub async fn cut_clip(
    runner: &FfmpegRunner,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start_secs: f64,
    end_secs: f64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Cutting clip: {} -> {} ({:.2}s - {:.2}s)",
        input.display(),
        output.display(),
        start_secs,
        end_secs
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start_secs)
        .duration(end_secs - start_secs)
        .video_codec(VIDEO_CODEC)
        .preset(PRESET)
        .crf(CUT_CRF)
        .audio_codec(AUDIO_CODEC);

    runner.run(&cmd).await
}

/// Upscale a clip to 4K with a sharpening filter, re-encoding the video
/// stream and copying audio through.
pub async fn upscale_to_4k(
    runner: &FfmpegRunner,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!("Upscaling clip to 4K: {} -> {}", input.display(), output.display());

    let filter = format!(
        "scale={}:{}:flags=lanczos,unsharp=5:5:0.8:3:3:0.4",
        UPSCALE_WIDTH, UPSCALE_HEIGHT
    );

    let cmd = FfmpegCommand::new(input, output)
        .video_filter(filter)
        .video_codec(VIDEO_CODEC)
        .preset(PRESET)
        .crf(UPSCALE_CRF)
        .audio_codec("copy");

    runner.run(&cmd).await
}

/// Concatenate clips at the stream level (no re-encode).
///
/// All inputs must share compatible codecs and parameters, which holds
/// for segments cut by [`cut_clip`] from the same source.
pub async fn concat_clips(
    runner: &FfmpegRunner,
    inputs: &[impl AsRef<Path>],
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    if inputs.is_empty() {
        return Err(MediaError::EmptyConcatList);
    }
    let output = output.as_ref();

    info!("Concatenating {} clips -> {}", inputs.len(), output.display());

    // Concat demuxer needs a list file; keep it alive until ffmpeg exits.
    let dir = output.parent().unwrap_or_else(|| Path::new("."));
    let mut list_file = tempfile::Builder::new()
        .prefix("concat_")
        .suffix(".txt")
        .tempfile_in(dir)?;
    for input in inputs {
        writeln!(list_file, "file '{}'", escape_concat_path(input.as_ref()))?;
    }
    list_file.flush()?;

    let cmd = FfmpegCommand::new(list_file.path(), output)
        .input_args(["-f", "concat", "-safe", "0"])
        .output_args(["-c", "copy"]);

    runner.run(&cmd).await
}

/// Escape a path for a concat demuxer list entry (single-quote rule).
fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "'\\''")
}
