//! Configuration module for Katha.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each pipeline
//! stage, `AppPaths` for cross-platform data directories and the fixed
//! artifact paths, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`. API credentials come from the process environment
//! (`.env` is loaded at startup), never from the TOML file.

pub mod paths;
pub mod settings;

pub use paths::{AppPaths, AUDIO_FILE_NAME, IMAGE_FILE_NAME};
pub use settings::{
    AppConfig, CaptionConfig, GenerationConfig, SpeechConfig, TranslationConfig, UiConfig,
    CAPTION_KEY_ENV, GENERATION_KEY_ENV,
};
