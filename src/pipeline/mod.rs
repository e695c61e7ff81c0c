//! Pipeline module for Katha.
//!
//! Wires the full image → caption → story → translation → audio pipeline
//! and exposes the shared state that the UI reads every frame.
//!
//! # Architecture
//!
//! ```text
//! StoryRequest (mpsc)
//!        │
//!        ▼
//! StoryOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ reset StorySession, persist image (fixed path)
//!        ├─ Captioner::caption                → Captioning
//!        ├─ Translator::translate (caption)   → Translating  (fail-soft)
//!        ├─ build_scene_prompt
//!        ├─ StoryGenerator::generate          → Generating
//!        ├─ Translator::translate (story)     → Translating  (fail-soft)
//!        └─ SpeechSynthesizer::synthesize     → Synthesizing
//!              └─ fixed-path MP3; failure clears the audio reference
//!
//! SharedState (Arc<Mutex<AppState>>) ←─── read by egui update() each frame
//! ```
//!
//! Exactly one request is processed at a time; a new request starts from a
//! freshly reset session, so results from two runs never mix.

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{PipelineError, StoryOrchestrator, StoryRequest};
pub use state::{new_shared_state, AppState, PipelineState, SharedState, StorySession};
