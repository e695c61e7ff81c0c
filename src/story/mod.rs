//! Story-generation module.
//!
//! This module provides:
//! * [`build_scene_prompt`] — deterministic caption + preferences template.
//! * [`PromptBuilder`] — chat-message framing with the word cap.
//! * [`StoryGenerator`] — async trait implemented by generation backends.
//! * [`ApiStoryGenerator`] — streaming OpenAI-compatible client.
//! * [`StoryError`] — error variants for generation operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use katha::config::GenerationConfig;
//! use katha::prefs::PreferenceSet;
//! use katha::story::{build_scene_prompt, ApiStoryGenerator, StoryGenerator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let generator = ApiStoryGenerator::from_config(&GenerationConfig::default());
//!
//!     let prompt = build_scene_prompt("a dog running on a beach", &PreferenceSet::default());
//!     match generator.generate(&prompt).await {
//!         Ok(story) => println!("{story}"),
//!         Err(e) => eprintln!("generation failed: {e}"),
//!     }
//! }
//! ```

pub mod generator;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use generator::{
    parse_stream_line, ApiStoryGenerator, StoryError, StoryGenerator, StreamEvent,
};
pub use prompt::{build_scene_prompt, PromptBuilder};

#[cfg(test)]
pub use generator::MockStoryGenerator;
