//! Karaoke caption chunking.
//!
//! Regroups word-level timestamps into short, rapidly-updating display
//! units instead of full-sentence subtitles.

use shorts_models::{CaptionChunk, TranscriptSegment, Word};

/// Chunk break thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPolicy {
    /// Maximum words per chunk
    pub max_words: usize,
    /// Maximum chunk duration in seconds, measured from the chunk's
    /// anchor start to the candidate word's end
    pub max_chunk_secs: f64,
    /// Maximum silence between consecutive words in one chunk
    pub max_gap_secs: f64,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            max_words: 4,
            max_chunk_secs: 2.0,
            max_gap_secs: 0.5,
        }
    }
}

/// Group a flat, ordered word sequence into caption chunks.
///
/// Single forward pass. The first word of a chunk always opens it; each
/// subsequent word is tested *before* appending, and a full chunk, an
/// overlong duration, or a large gap flushes the current chunk and makes
/// the triggering word the sole member of the next one.
pub fn chunk_words(words: &[Word], policy: &ChunkPolicy) -> Vec<CaptionChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&Word> = Vec::new();
    let mut chunk_start = 0.0;

    for word in words {
        if current.is_empty() {
            chunk_start = word.start;
            current.push(word);
            continue;
        }

        let last = current[current.len() - 1];
        let duration = word.end - chunk_start;
        let gap = word.start - last.end;

        if current.len() >= policy.max_words
            || duration > policy.max_chunk_secs
            || gap > policy.max_gap_secs
        {
            chunks.push(flush(&current, chunk_start));
            current.clear();
            chunk_start = word.start;
            current.push(word);
        } else {
            current.push(word);
        }
    }

    if !current.is_empty() {
        chunks.push(flush(&current, chunk_start));
    }

    chunks
}

fn flush(words: &[&Word], chunk_start: f64) -> CaptionChunk {
    // Whisper emits words with leading spaces; trim each before joining
    // so chunk text is single-spaced.
    let text = words
        .iter()
        .map(|w| w.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    CaptionChunk {
        start: chunk_start,
        end: words[words.len() - 1].end,
        text,
    }
}

/// Fallback for engines without word timestamps: each native segment
/// becomes one chunk verbatim, with no further splitting.
pub fn chunks_from_segments(segments: &[TranscriptSegment]) -> Vec<CaptionChunk> {
    segments
        .iter()
        .map(|s| CaptionChunk {
            start: s.start,
            end: s.end,
            text: s.text.trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(spec: &[(f64, f64, &str)]) -> Vec<Word> {
        spec.iter()
            .map(|(s, e, t)| Word::new(*s, *e, *t))
            .collect()
    }

    #[test]
    fn test_word_count_break() {
        // 5 tightly-packed words: the first 4 form chunk 1, the 5th
        // starts chunk 2.
        let words = words(&[
            (0.0, 0.3, "one"),
            (0.3, 0.6, "two"),
            (0.6, 0.9, "three"),
            (0.9, 1.2, "four"),
            (1.2, 1.5, "five"),
        ]);

        let chunks = chunk_words(&words, &ChunkPolicy::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "one two three four");
        assert_eq!(chunks[0].start, 0.0);
        assert_eq!(chunks[0].end, 1.2);
        assert_eq!(chunks[1].text, "five");
        assert_eq!(chunks[1].start, 1.2);
    }

    #[test]
    fn test_duration_break() {
        // Slow speech: the third word would stretch the chunk past 2s.
        let words = words(&[
            (0.0, 0.8, "sloow"),
            (0.9, 1.8, "woords"),
            (1.9, 2.7, "here"),
        ]);

        let chunks = chunk_words(&words, &ChunkPolicy::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "sloow woords");
        assert_eq!(chunks[1].text, "here");
    }

    #[test]
    fn test_gap_break() {
        let words = words(&[
            (0.0, 0.3, "before"),
            (0.3, 0.6, "pause"),
            (1.5, 1.8, "after"),
        ]);

        let chunks = chunk_words(&words, &ChunkPolicy::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "before pause");
        assert_eq!(chunks[1].text, "after");
        // The triggering word anchors the new chunk
        assert_eq!(chunks[1].start, 1.5);
    }

    #[test]
    fn test_single_word_never_breaks_empty_chunk() {
        // A word longer than max_chunk_secs still opens its own chunk.
        let words = words(&[(0.0, 3.5, "loooong")]);
        let chunks = chunk_words(&words, &ChunkPolicy::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "loooong");
    }

    #[test]
    fn test_bounds_property() {
        // Synthetic stream with mixed pacing; every closed chunk obeys
        // the policy bounds and chunks never overlap.
        let mut spec = Vec::new();
        let mut t = 0.0;
        for i in 0..40 {
            let len = 0.2 + (i % 3) as f64 * 0.25;
            let gap = if i % 7 == 0 { 0.8 } else { 0.1 };
            spec.push((t, t + len, "w"));
            t += len + gap;
        }
        let words: Vec<Word> = spec.iter().map(|(s, e, t)| Word::new(*s, *e, *t)).collect();

        let policy = ChunkPolicy::default();
        let chunks = chunk_words(&words, &policy);
        assert!(!chunks.is_empty());

        let mut prev_end = f64::NEG_INFINITY;
        for chunk in &chunks {
            let word_count = chunk.text.split_whitespace().count();
            assert!(word_count >= 1 && word_count <= policy.max_words);
            assert!(chunk.end > chunk.start);
            assert!(chunk.start >= prev_end, "chunks must not overlap");
            prev_end = chunk.end;
        }
    }

    #[test]
    fn test_text_is_trimmed_and_single_spaced() {
        // Whisper emits words with leading spaces
        let words = vec![
            Word::new(0.0, 0.3, " hello"),
            Word::new(0.3, 0.6, " world"),
        ];
        let chunks = chunk_words(&words, &ChunkPolicy::default());
        assert_eq!(chunks[0].text, "hello world");
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk_words(&[], &ChunkPolicy::default()).is_empty());
    }

    #[test]
    fn test_segment_fallback() {
        let segments = vec![
            TranscriptSegment {
                start: 0.0,
                end: 4.2,
                text: " A whole sentence at once. ".to_string(),
            },
            TranscriptSegment {
                start: 4.5,
                end: 7.0,
                text: "And another.".to_string(),
            },
        ];

        let chunks = chunks_from_segments(&segments);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "A whole sentence at once.");
        assert_eq!(chunks[1].start, 4.5);
    }
}
