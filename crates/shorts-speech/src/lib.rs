//! Speech recognition client and caption chunking.
//!
//! This crate provides:
//! - A Whisper CLI client producing word-level timestamps
//! - The karaoke chunker that regroups words into short display units
//! - SRT serialization and parsing

pub mod chunker;
pub mod error;
pub mod srt;
pub mod whisper;

pub use chunker::{chunk_words, chunks_from_segments, ChunkPolicy};
pub use error::{SpeechError, SpeechResult};
pub use srt::{parse_srt, render_srt, write_srt};
pub use whisper::{Transcriber, Transcription, WhisperTranscriber};
