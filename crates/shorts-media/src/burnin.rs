//! Subtitle burn-in.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

const VIDEO_CODEC: &str = "libx264";
const PRESET: &str = "veryfast";
const BURN_CRF: u8 = 23;

/// Render subtitles into the video stream, copying audio through.
///
/// `font_size` must track the output resolution: captions burned after a
/// 4K upscale need roughly double the 1080-class size to stay legible.
pub async fn burn_subtitles(
    runner: &FfmpegRunner,
    video: impl AsRef<Path>,
    subtitles: impl AsRef<Path>,
    output: impl AsRef<Path>,
    font_size: u32,
) -> MediaResult<()> {
    let video = video.as_ref();
    let subtitles = subtitles.as_ref();
    let output = output.as_ref();

    info!(
        "Burning subtitles: {} + {} -> {} (font size {})",
        video.display(),
        subtitles.display(),
        output.display(),
        font_size
    );

    let filter = format!(
        "subtitles='{}':force_style='FontSize={}'",
        escape_filter_path(subtitles),
        font_size
    );

    let cmd = FfmpegCommand::new(video, output)
        .video_filter(filter)
        .video_codec(VIDEO_CODEC)
        .preset(PRESET)
        .crf(BURN_CRF)
        .audio_codec("copy");

    runner.run(&cmd).await
}

/// Escape a path for use inside an FFmpeg filter argument.
///
/// Backslashes become forward slashes, and colons and single quotes are
/// escaped; unescaped they terminate the filter option value.
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_filter_path_plain() {
        assert_eq!(escape_filter_path(Path::new("/tmp/clip.srt")), "/tmp/clip.srt");
    }

    #[test]
    fn test_escape_filter_path_colon_and_backslash() {
        assert_eq!(
            escape_filter_path(Path::new("C:\\media\\clip.srt")),
            "C\\:/media/clip.srt"
        );
    }

    #[test]
    fn test_escape_filter_path_quote() {
        assert_eq!(
            escape_filter_path(Path::new("/tmp/it's.srt")),
            "/tmp/it\\'s.srt"
        );
    }
}
