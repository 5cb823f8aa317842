//! SRT serialization and parsing.

use std::path::Path;

use shorts_models::{format_srt_time, parse_srt_time, CaptionChunk};

use crate::error::{SpeechError, SpeechResult};

/// Render caption chunks as an SRT document.
///
/// One entry per chunk: 1-based index, `start --> end` time range in
/// `HH:MM:SS,mmm`, the text, and a blank separator line. Chunks arrive
/// in non-decreasing start order by construction.
pub fn render_srt(chunks: &[CaptionChunk]) -> String {
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_time(chunk.start),
            format_srt_time(chunk.end),
            chunk.text.trim()
        ));
    }
    out
}

/// Write caption chunks to an SRT file.
pub async fn write_srt(chunks: &[CaptionChunk], path: impl AsRef<Path>) -> SpeechResult<()> {
    tokio::fs::write(path.as_ref(), render_srt(chunks)).await?;
    Ok(())
}

/// Parse an SRT document back into caption chunks.
pub fn parse_srt(content: &str) -> SpeechResult<Vec<CaptionChunk>> {
    let mut chunks = Vec::new();
    let mut lines = content.lines().enumerate().peekable();

    while let Some((line_no, line)) = lines.next() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Index line
        line.parse::<usize>()
            .map_err(|_| SpeechError::srt_parse(line_no + 1, "expected entry index"))?;

        // Time range line
        let (time_no, time_line) = lines
            .next()
            .ok_or_else(|| SpeechError::srt_parse(line_no + 1, "missing time range"))?;
        let (start, end) = time_line
            .trim()
            .split_once(" --> ")
            .ok_or_else(|| SpeechError::srt_parse(time_no + 1, "expected 'start --> end'"))?;
        let start = parse_srt_time(start)
            .map_err(|e| SpeechError::srt_parse(time_no + 1, e.to_string()))?;
        let end = parse_srt_time(end)
            .map_err(|e| SpeechError::srt_parse(time_no + 1, e.to_string()))?;

        // Text lines until blank or EOF
        let mut text_lines = Vec::new();
        while let Some((_, text)) = lines.peek() {
            if text.trim().is_empty() {
                lines.next();
                break;
            }
            text_lines.push(text.trim().to_string());
            lines.next();
        }

        chunks.push(CaptionChunk {
            start,
            end,
            text: text_lines.join(" "),
        });
    }

    Ok(chunks)
}
