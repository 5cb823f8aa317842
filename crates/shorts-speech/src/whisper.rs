//! Whisper CLI transcription client.
//!
//! Invokes a whisper-compatible binary that writes a JSON transcript
//! with segment and word timestamps, and flattens the result into one
//! global word sequence for the chunker.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use shorts_models::{TranscriptSegment, Word};

use crate::error::{SpeechError, SpeechResult};

/// A transcript with a detected language.
///
/// `words` is empty when the engine did not emit word timestamps; the
/// caller then falls back to segment granularity.
#[derive(Debug, Clone)]
pub struct Transcription {
    /// Detected language code (e.g. "en")
    pub language: String,
    /// Native segment-level transcript
    pub segments: Vec<TranscriptSegment>,
    /// Flattened word-level transcript, ordered by start time
    pub words: Vec<Word>,
}

impl Transcription {
    /// Whether the engine provided word-level timestamps.
    pub fn has_word_timestamps(&self) -> bool {
        !self.words.is_empty()
    }
}

/// Speech collaborator contract.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file, requesting word-level timestamps.
    async fn transcribe(&self, audio: &Path) -> SpeechResult<Transcription>;
}

/// Whisper CLI client.
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    /// Binary name or path
    bin: String,
    /// Model size passed as `--model`
    model: String,
}

impl WhisperTranscriber {
    /// Create a client for a specific binary and model.
    pub fn new(bin: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            model: model.into(),
        }
    }

    /// Create a client from `WHISPER_BIN` / `WHISPER_MODEL`.
    pub fn from_env() -> Self {
        Self {
            bin: std::env::var("WHISPER_BIN").unwrap_or_else(|_| "whisper".to_string()),
            model: std::env::var("WHISPER_MODEL").unwrap_or_else(|_| "small".to_string()),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &Path) -> SpeechResult<Transcription> {
        which::which(&self.bin).map_err(|_| SpeechError::EngineNotFound(self.bin.clone()))?;

        let out_dir = tempfile::tempdir()?;

        info!(
            "Transcribing {} with {} (model {})",
            audio.display(),
            self.bin,
            self.model
        );

        let output = Command::new(&self.bin)
            .arg(audio)
            .args(["--model", &self.model])
            .args(["--output_format", "json"])
            .args(["--word_timestamps", "True"])
            .arg("--output_dir")
            .arg(out_dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(SpeechError::engine_failed(
                format!("{} exited with non-zero status", self.bin),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        let stem = audio
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let json_path = out_dir.path().join(format!("{}.json", stem));
        if !json_path.exists() {
            return Err(SpeechError::MissingTranscript(json_path));
        }

        let content = tokio::fs::read_to_string(&json_path).await?;
        parse_transcript(&content)
    }
}

/// Whisper JSON output format.
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    language: Option<String>,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    words: Vec<WhisperWord>,
}

#[derive(Debug, Deserialize)]
struct WhisperWord {
    word: String,
    start: f64,
    end: f64,
}

/// Parse a whisper JSON document into a [`Transcription`].
///
/// Word boundaries across segments are flattened into one global
/// sequence.
fn parse_transcript(content: &str) -> SpeechResult<Transcription> {
    let parsed: WhisperOutput = serde_json::from_str(content)?;

    let language = parsed.language.unwrap_or_else(|| {
        warn!("Transcript missing language field, defaulting to 'en'");
        "en".to_string()
    });

    let mut segments = Vec::with_capacity(parsed.segments.len());
    let mut words = Vec::new();

    for segment in parsed.segments {
        for word in &segment.words {
            words.push(Word::new(word.start, word.end, word.word.clone()));
        }
        segments.push(TranscriptSegment {
            start: segment.start,
            end: segment.end,
            text: segment.text,
        });
    }

    Ok(Transcription {
        language,
        segments,
        words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcript_with_words() {
        let json = r#"{
            "text": " hello world again",
            "language": "en",
            "segments": [
                {
                    "start": 0.0, "end": 1.0, "text": " hello world",
                    "words": [
                        {"word": " hello", "start": 0.0, "end": 0.4, "probability": 0.99},
                        {"word": " world", "start": 0.4, "end": 1.0, "probability": 0.97}
                    ]
                },
                {
                    "start": 1.2, "end": 2.0, "text": " again",
                    "words": [
                        {"word": " again", "start": 1.2, "end": 2.0, "probability": 0.95}
                    ]
                }
            ]
        }"#;

        let t = parse_transcript(json).unwrap();
        assert_eq!(t.language, "en");
        assert_eq!(t.segments.len(), 2);
        assert!(t.has_word_timestamps());
        // Words are flattened across segments, in order
        assert_eq!(t.words.len(), 3);
        assert_eq!(t.words[2].text, " again");
        assert_eq!(t.words[2].start, 1.2);
    }

    #[test]
    fn test_parse_transcript_without_words() {
        let json = r#"{
            "language": "de",
            "segments": [
                {"start": 0.0, "end": 3.5, "text": "Ein ganzer Satz."}
            ]
        }"#;

        let t = parse_transcript(json).unwrap();
        assert!(!t.has_word_timestamps());
        assert_eq!(t.segments.len(), 1);
        assert_eq!(t.language, "de");
    }

    #[test]
    fn test_parse_transcript_rejects_garbage() {
        assert!(parse_transcript("not json").is_err());
    }
}
