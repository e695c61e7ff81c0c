//! Pipeline state machine, per-run session context, and shared state.
//!
//! [`PipelineState`] drives the orchestrator's state machine. The UI reads
//! it via [`SharedState`] to render the appropriate view each frame.
//!
//! [`StorySession`] is the explicit per-run context: every field one
//! pipeline run produces, with a documented [`reset`](StorySession::reset)
//! invoked at the start of the next run — results are never carried over
//! implicitly.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<AppState>>` — cheap to
//! clone and safe to share across threads.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the image-to-story pipeline.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──user action──▶ Captioning
///                       ──caption ok──▶ Translating (caption)
///                                       ──▶ Generating
///                                           ──story ok──▶ Translating (story)
///                                                         ──▶ Synthesizing
///                                                             ──▶ Complete
/// Captioning / Generating ──error──▶ Failed
/// Complete / Failed ──next user action──▶ Captioning  (session reset first)
/// ```
///
/// Translation and synthesis failures do not reach `Failed`: translation
/// degrades to the original text with a warning, and a synthesis failure
/// still ends in `Complete` with the audio reference cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Waiting for the user to trigger a run.
    #[default]
    Idle,

    /// The captioning backend is describing the uploaded image.
    Captioning,

    /// The translator is working (caption or story).
    Translating,

    /// The generation API is streaming the story.
    Generating,

    /// The speech backend is synthesizing the translated story.
    Synthesizing,

    /// The run finished with a story (audio may or may not exist).
    Complete,

    /// Captioning or generation failed; the run was short-circuited.
    Failed,
}

impl PipelineState {
    /// Returns `true` while the pipeline is actively processing.
    ///
    /// The UI uses this to disable the action button and show a spinner.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PipelineState::Captioning
                | PipelineState::Translating
                | PipelineState::Generating
                | PipelineState::Synthesizing
        )
    }

    /// A short human-readable label for the UI status line.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Captioning => "Reading the image",
            PipelineState::Translating => "Translating",
            PipelineState::Generating => "Weaving the story",
            PipelineState::Synthesizing => "Recording the narration",
            PipelineState::Complete => "Done",
            PipelineState::Failed => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// StorySession
// ---------------------------------------------------------------------------

/// Everything one pipeline run produces.
///
/// Both the English caption and its translation are kept: English is the
/// canonical source (the generation prompt embeds it), the translation is
/// what the interface shows. Same for the story pair — `story_english`
/// feeds translation, `story_translated` feeds display and audio.
#[derive(Debug, Clone, Default)]
pub struct StorySession {
    /// English caption of the uploaded image (canonical).
    pub caption: Option<String>,

    /// Caption in the selected story language (display).
    pub caption_translated: Option<String>,

    /// Generated story in English (canonical, translation source).
    pub story_english: Option<String>,

    /// Story in the selected language (display + audio source).
    pub story_translated: Option<String>,

    /// Path of the synthesized audio artifact; `None` until synthesis
    /// succeeds, and cleared again whenever it fails.
    pub audio_file_path: Option<PathBuf>,

    /// `true` iff this run produced a story. Audio failure does not clear
    /// it; captioning or generation failure leaves it `false`.
    pub processing_complete: bool,
}

impl StorySession {
    /// Clear every field back to the initial state.
    ///
    /// Called at the start of each run so results from two different runs
    /// can never mix.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state — the single source of truth for the UI.
///
/// Held behind [`SharedState`] (`Arc<Mutex<AppState>>`). The pipeline
/// orchestrator mutates it; the egui update loop reads it each frame.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current phase of the pipeline.
    pub pipeline: PipelineState,

    /// Results of the current (or last) run.
    pub session: StorySession,

    /// Non-fatal notice (translation fell back to the original text).
    pub warning: Option<String>,

    /// Error message for `Failed` runs and for audio-synthesis failures
    /// within otherwise complete runs.
    pub error_message: Option<String>,
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].
///
/// Cheap to clone (`Arc` clone). Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedState = Arc<Mutex<AppState>>;

/// Construct a new [`SharedState`] wrapping a default [`AppState`].
pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(AppState::default()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
