//! Speech module — synthesis and playback.
//!
//! This module provides:
//! * [`SpeechSynthesizer`] — async trait implemented by TTS backends.
//! * [`GoogleTts`] — HTTP client for the Google translate TTS endpoint,
//!   with whitespace chunking and MP3 segment merging.
//! * [`SpeechError`] — error variants for synthesis operations.
//! * [`AudioPlayer`] — rodio-backed playback of the audio artifact.
//!
//! The pipeline synthesizes the *translated* story text and persists the
//! returned MP3 bytes at the fixed audio path; the UI owns the player.

pub mod player;
pub mod synthesizer;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use player::AudioPlayer;
pub use synthesizer::{split_text, GoogleTts, SpeechError, SpeechSynthesizer};

#[cfg(test)]
pub use synthesizer::MockSpeechSynthesizer;
