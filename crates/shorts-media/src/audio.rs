//! Audio extraction for speech recognition.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Extract mono 16 kHz PCM audio from a video, the input format the
/// speech engine expects.
pub async fn extract_audio(
    runner: &FfmpegRunner,
    video: impl AsRef<Path>,
    audio: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let audio = audio.as_ref();

    info!("Extracting audio: {} -> {}", video.display(), audio.display());

    let cmd = FfmpegCommand::new(video, audio)
        .no_video()
        .output_args(["-ac", "1", "-ar", "16000", "-c:a", "pcm_s16le"]);

    runner.run(&cmd).await
}
