//! Session orchestrator — drives the full image → caption → story →
//! translation → audio pipeline.
//!
//! [`StoryOrchestrator`] owns the [`SharedState`] and responds to
//! [`StoryRequest`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Pipeline flow
//!
//! ```text
//! StoryRequest { image, prefs, language }
//!   ├─▶ reset session, persist image at the fixed path     [Captioning]
//!   ├─▶ Captioner::caption                                 [Captioning]
//!   ├─▶ Translator::translate (caption, fail-soft)         [Translating]
//!   ├─▶ build_scene_prompt (deterministic)
//!   ├─▶ StoryGenerator::generate (streamed)                [Generating]
//!   ├─▶ Translator::translate (story, fail-soft)           [Translating]
//!   │     processing_complete = true
//!   └─▶ SpeechSynthesizer::synthesize → fixed audio path   [Synthesizing]
//!         └─ failure clears the audio reference, run still Complete
//! ```
//!
//! Captioning and generation failures short-circuit the rest of the run
//! and land in `Failed` with `processing_complete == false`. Translation
//! failures degrade to the original text with a recorded warning. Every
//! external call blocks this task only; the UI keeps polling shared state.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::caption::Captioner;
use crate::config::AppPaths;
use crate::language::Language;
use crate::prefs::PreferenceSet;
use crate::speech::SpeechSynthesizer;
use crate::story::{build_scene_prompt, StoryGenerator};
use crate::translate::Translator;

use super::state::{PipelineState, SharedState};

// ---------------------------------------------------------------------------
// StoryRequest
// ---------------------------------------------------------------------------

/// One user-triggered pipeline run.
#[derive(Debug, Clone)]
pub struct StoryRequest {
    /// Raw bytes of the uploaded image.
    pub image: Vec<u8>,
    /// The nine story-shaping choices.
    pub prefs: PreferenceSet,
    /// Target language for the caption, story, and narration.
    pub language: Language,
}

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Run-terminating failures inside the pipeline.
///
/// All variants carry a human-readable description so the UI can display
/// them without knowing the internal cause. Translation and synthesis
/// failures are deliberately absent — they degrade, they never terminate.
#[derive(Debug)]
pub enum PipelineError {
    /// The captioning backend failed or returned nothing.
    Caption(String),
    /// The generation API failed (auth, network, parse, empty stream).
    Generation(String),
    /// A fixed-path artifact could not be written.
    Artifact(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Caption(msg) => write!(f, "Error in image captioning: {msg}"),
            PipelineError::Generation(msg) => write!(f, "Error in story generation: {msg}"),
            PipelineError::Artifact(msg) => write!(f, "Could not store a file: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// StoryOrchestrator
// ---------------------------------------------------------------------------

/// Drives the complete image-to-story pipeline.
///
/// Create with [`StoryOrchestrator::new`], then call [`run`](Self::run)
/// inside a tokio task. Exactly one request is processed at a time; each
/// new request starts from a freshly reset session.
pub struct StoryOrchestrator {
    state: SharedState,
    paths: AppPaths,
    captioner: Arc<dyn Captioner>,
    generator: Arc<dyn StoryGenerator>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl StoryOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `state`       — shared application state (also read by the UI).
    /// * `paths`       — resolved artifact paths (image + audio).
    /// * `captioner`   — image-captioning backend.
    /// * `generator`   — story-generation backend.
    /// * `translator`  — translation backend.
    /// * `synthesizer` — speech-synthesis backend.
    pub fn new(
        state: SharedState,
        paths: AppPaths,
        captioner: Arc<dyn Captioner>,
        generator: Arc<dyn StoryGenerator>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            state,
            paths,
            captioner,
            generator,
            translator,
            synthesizer,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until `request_rx` is closed.
    ///
    /// This is an `async fn` and should be spawned as a tokio task from
    /// `main()`. It never returns while the channel is open. Any
    /// run-terminating error is mapped to the `Failed` state with a retry
    /// advisory — nothing propagates out of this loop.
    pub async fn run(self, mut request_rx: mpsc::Receiver<StoryRequest>) {
        while let Some(request) = request_rx.recv().await {
            if let Err(e) = self.run_once(request).await {
                self.set_error(format!(
                    "{e} — please try again, or check the logs if the problem persists."
                ));
            }
        }

        log::info!("pipeline: request channel closed, orchestrator shutting down");
    }

    // -----------------------------------------------------------------------
    // One pipeline run
    // -----------------------------------------------------------------------

    async fn run_once(&self, request: StoryRequest) -> Result<(), PipelineError> {
        log::debug!(
            "pipeline: run starting ({} image bytes, language {})",
            request.image.len(),
            request.language.code()
        );

        // ── 1. Fresh session ─────────────────────────────────────────────
        {
            let mut st = self.state.lock().unwrap();
            st.session.reset();
            st.warning = None;
            st.error_message = None;
            st.pipeline = PipelineState::Captioning;
        }

        // ── 2. Persist the image at the fixed path (last writer wins) ────
        std::fs::create_dir_all(&self.paths.data_dir)
            .map_err(|e| PipelineError::Artifact(e.to_string()))?;
        std::fs::write(&self.paths.image_file, &request.image)
            .map_err(|e| PipelineError::Artifact(e.to_string()))?;

        // ── 3. Caption ───────────────────────────────────────────────────
        let caption = self
            .captioner
            .caption(&request.image)
            .await
            .map_err(|e| PipelineError::Caption(e.to_string()))?;

        log::debug!("pipeline: caption = {caption:?}");
        {
            let mut st = self.state.lock().unwrap();
            st.session.caption = Some(caption.clone());
        }

        // ── 4. Translate the caption (fail-soft) ─────────────────────────
        self.set_state(PipelineState::Translating);
        let caption_translated = self
            .translate_or_original(&caption, request.language)
            .await;
        {
            let mut st = self.state.lock().unwrap();
            st.session.caption_translated = Some(caption_translated);
        }

        // ── 5. Compose the prompt and generate the story ─────────────────
        let prompt = build_scene_prompt(&caption, &request.prefs);

        self.set_state(PipelineState::Generating);
        let story = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| PipelineError::Generation(e.to_string()))?;

        log::debug!("pipeline: story = {} chars", story.len());
        {
            let mut st = self.state.lock().unwrap();
            st.session.story_english = Some(story.clone());
        }

        // ── 6. Translate the story (fail-soft) ───────────────────────────
        self.set_state(PipelineState::Translating);
        let story_translated = self.translate_or_original(&story, request.language).await;
        {
            let mut st = self.state.lock().unwrap();
            st.session.story_translated = Some(story_translated.clone());
            // A story exists — the run counts as complete from here on,
            // whatever happens to the audio.
            st.session.processing_complete = true;
        }

        // ── 7. Synthesize and persist the narration ──────────────────────
        self.set_state(PipelineState::Synthesizing);
        match self
            .synthesizer
            .synthesize(&story_translated, request.language)
            .await
        {
            Ok(bytes) => match std::fs::write(&self.paths.audio_file, &bytes) {
                Ok(()) => {
                    let mut st = self.state.lock().unwrap();
                    st.session.audio_file_path = Some(self.paths.audio_file.clone());
                }
                Err(e) => self.report_audio_failure(&format!("could not store audio: {e}")),
            },
            Err(e) => self.report_audio_failure(&e.to_string()),
        }

        self.set_state(PipelineState::Complete);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Translate `text`, falling back to the original on any backend error.
    ///
    /// The failure is recorded as a user-visible warning; it never
    /// terminates the run.
    async fn translate_or_original(&self, text: &str, language: Language) -> String {
        match self.translator.translate(text, language).await {
            Ok(translated) => translated,
            Err(e) => {
                log::warn!("pipeline: translation failed ({e}), keeping original text");
                let mut st = self.state.lock().unwrap();
                st.warning = Some(format!("Translation failed: {e}. Showing original text."));
                text.to_string()
            }
        }
    }

    /// Record a synthesis failure: audio reference cleared, message shown,
    /// run still completes.
    fn report_audio_failure(&self, msg: &str) {
        log::warn!("pipeline: audio synthesis failed: {msg}");
        let mut st = self.state.lock().unwrap();
        st.session.audio_file_path = None;
        st.error_message = Some(format!("Error in audio generation: {msg}"));
    }

    fn set_state(&self, state: PipelineState) {
        let mut st = self.state.lock().unwrap();
        st.pipeline = state;
    }

    fn set_error(&self, message: String) {
        log::error!("pipeline error: {message}");
        let mut st = self.state.lock().unwrap();
        st.pipeline = PipelineState::Failed;
        st.error_message = Some(message);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::{CaptionError, MockCaptioner};
    use crate::pipeline::state::new_shared_state;
    use crate::prefs::{
        Conflict, Ending, Genre, Plot, PreferenceSet, Region, Setting, Theme, Tone, Twist,
    };
    use crate::speech::{MockSpeechSynthesizer, SpeechError};
    use crate::story::{MockStoryGenerator, StoryError};
    use crate::translate::{MockTranslator, TranslateError};
    use tempfile::tempdir;

    const STORY: &str = "Under the banyan tree, a dog and a fisherman's son kept an old promise.";

    /// The preference set from the dog-on-a-beach scenario.
    fn beach_prefs() -> PreferenceSet {
        PreferenceSet {
            region: Region::East,
            genre: Genre::Folklore,
            setting: Setting::VillageLife,
            plot: Plot::FriendshipAndLoyalty,
            tone: Tone::Humorous,
            theme: Theme::Hope,
            conflict: Conflict::ManVsNature,
            twist: Twist::HiddenLineage,
            ending: Ending::Happy,
        }
    }

    fn beach_request(language: Language) -> StoryRequest {
        StoryRequest {
            image: vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3],
            prefs: beach_prefs(),
            language,
        }
    }

    struct Mocks {
        captioner: Arc<dyn Captioner>,
        generator: Arc<dyn StoryGenerator>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    }

    impl Default for Mocks {
        fn default() -> Self {
            Self {
                captioner: Arc::new(MockCaptioner::ok("a dog running on a beach")),
                generator: Arc::new(MockStoryGenerator::ok(STORY)),
                translator: Arc::new(MockTranslator::ok("अनुवादित पाठ")),
                synthesizer: Arc::new(MockSpeechSynthesizer::ok(b"ID3-mp3-bytes".to_vec())),
            }
        }
    }

    fn make_orchestrator(
        root: &std::path::Path,
        mocks: Mocks,
    ) -> (StoryOrchestrator, SharedState, AppPaths) {
        let state = new_shared_state();
        let paths = AppPaths::rooted_at(root);
        let orc = StoryOrchestrator::new(
            Arc::clone(&state),
            paths.clone(),
            mocks.captioner,
            mocks.generator,
            mocks.translator,
            mocks.synthesizer,
        );
        (orc, state, paths)
    }

    async fn run_requests(orc: StoryOrchestrator, requests: Vec<StoryRequest>) {
        let (tx, rx) = mpsc::channel(4);
        for request in requests {
            tx.send(request).await.unwrap();
        }
        drop(tx); // close channel so run() returns
        orc.run(rx).await;
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// Full dog-on-a-beach scenario in Hindi: every session field
    /// populated, both artifacts written, `processing_complete == true`.
    #[tokio::test]
    async fn hindi_scenario_completes_with_audio() {
        let dir = tempdir().unwrap();
        let (orc, state, paths) = make_orchestrator(dir.path(), Mocks::default());
        let request = beach_request(Language::Hindi);
        let image = request.image.clone();

        run_requests(orc, vec![request]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Complete);
        assert_eq!(st.session.caption.as_deref(), Some("a dog running on a beach"));
        assert_eq!(st.session.caption_translated.as_deref(), Some("अनुवादित पाठ"));
        assert_eq!(st.session.story_english.as_deref(), Some(STORY));
        assert_eq!(st.session.story_translated.as_deref(), Some("अनुवादित पाठ"));
        assert!(st.session.processing_complete);
        assert_eq!(st.session.audio_file_path.as_deref(), Some(&*paths.audio_file));
        assert!(st.warning.is_none());
        assert!(st.error_message.is_none());

        // Both fixed-path artifacts hold this run's bytes.
        assert_eq!(std::fs::read(&paths.image_file).unwrap(), image);
        assert_eq!(std::fs::read(&paths.audio_file).unwrap(), b"ID3-mp3-bytes");
    }

    /// With the pivot language, caption and story pass through untranslated.
    #[tokio::test]
    async fn english_run_keeps_text_untranslated() {
        let dir = tempdir().unwrap();
        let (orc, state, _paths) = make_orchestrator(dir.path(), Mocks::default());

        run_requests(orc, vec![beach_request(Language::English)]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Complete);
        assert_eq!(
            st.session.caption_translated.as_deref(),
            Some("a dog running on a beach")
        );
        assert_eq!(st.session.story_translated.as_deref(), Some(STORY));
        assert!(st.session.processing_complete);
    }

    /// Captioning failure short-circuits everything downstream.
    #[tokio::test]
    async fn caption_failure_short_circuits_the_run() {
        let dir = tempdir().unwrap();
        let mocks = Mocks {
            captioner: Arc::new(MockCaptioner::err(CaptionError::Empty)),
            ..Mocks::default()
        };
        let (orc, state, paths) = make_orchestrator(dir.path(), mocks);

        run_requests(orc, vec![beach_request(Language::Hindi)]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Failed);
        assert!(st
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("image captioning")));
        assert!(st.session.caption.is_none());
        assert!(st.session.story_english.is_none());
        assert!(!st.session.processing_complete);
        assert!(st.session.audio_file_path.is_none());
        assert!(!paths.audio_file.exists());
    }

    /// Generation auth failure: error surfaced, `processing_complete`
    /// stays false, no audio reference stored.
    #[tokio::test]
    async fn generation_auth_failure_leaves_run_incomplete() {
        let dir = tempdir().unwrap();
        let mocks = Mocks {
            generator: Arc::new(MockStoryGenerator::err(StoryError::Auth(401))),
            ..Mocks::default()
        };
        let (orc, state, paths) = make_orchestrator(dir.path(), mocks);

        run_requests(orc, vec![beach_request(Language::Hindi)]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Failed);
        assert!(st
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("story generation")));
        // The caption part of the session survives for partial rendering.
        assert!(st.session.caption.is_some());
        assert!(st.session.story_english.is_none());
        assert!(st.session.story_translated.is_none());
        assert!(!st.session.processing_complete);
        assert!(st.session.audio_file_path.is_none());
        assert!(!paths.audio_file.exists());
    }

    /// Translation failure never blocks the run: original text is used,
    /// a warning is recorded, story and audio still happen.
    #[tokio::test]
    async fn translation_failure_degrades_to_original_text() {
        let dir = tempdir().unwrap();
        let mocks = Mocks {
            translator: Arc::new(MockTranslator::err(TranslateError::Timeout)),
            ..Mocks::default()
        };
        let (orc, state, paths) = make_orchestrator(dir.path(), mocks);

        run_requests(orc, vec![beach_request(Language::Hindi)]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Complete);
        assert!(st
            .warning
            .as_deref()
            .is_some_and(|w| w.contains("Translation failed")));
        assert_eq!(
            st.session.caption_translated.as_deref(),
            Some("a dog running on a beach")
        );
        assert_eq!(st.session.story_translated.as_deref(), Some(STORY));
        assert!(st.session.processing_complete);
        assert!(st.session.audio_file_path.is_some());
        assert!(paths.audio_file.exists());
    }

    /// Audio failure clears the audio reference but the run still counts
    /// as complete — the story exists.
    #[tokio::test]
    async fn audio_failure_clears_reference_but_run_completes() {
        let dir = tempdir().unwrap();
        let mocks = Mocks {
            synthesizer: Arc::new(MockSpeechSynthesizer::err(SpeechError::Status(404))),
            ..Mocks::default()
        };
        let (orc, state, _paths) = make_orchestrator(dir.path(), mocks);

        run_requests(orc, vec![beach_request(Language::Hindi)]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Complete);
        assert!(st.session.processing_complete);
        assert!(st.session.audio_file_path.is_none());
        assert!(st
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("audio generation")));
    }

    /// A second run fully replaces the first: fresh session, fresh
    /// artifacts — no stale mixing of results from two different runs.
    #[tokio::test]
    async fn rerun_overwrites_previous_results() {
        let dir = tempdir().unwrap();
        let (orc, state, paths) = make_orchestrator(dir.path(), Mocks::default());

        let first = beach_request(Language::Hindi);
        let mut second = beach_request(Language::English);
        second.image = vec![9, 9, 9, 9];
        let second_image = second.image.clone();

        run_requests(orc, vec![first, second]).await;

        let st = state.lock().unwrap();
        // The session reflects the second (English) run only.
        assert_eq!(
            st.session.caption_translated.as_deref(),
            Some("a dog running on a beach")
        );
        assert_eq!(st.session.story_translated.as_deref(), Some(STORY));
        assert!(st.session.processing_complete);
        // The image artifact holds the second run's bytes.
        assert_eq!(std::fs::read(&paths.image_file).unwrap(), second_image);
    }

    /// An unwritable data directory is an artifact error: the run fails
    /// with the retry advisory rather than panicking.
    #[tokio::test]
    async fn unwritable_artifact_path_fails_the_run() {
        let dir = tempdir().unwrap();
        // Block directory creation by occupying the root with a file.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let (orc, state, _paths) = make_orchestrator(&blocker, Mocks::default());

        run_requests(orc, vec![beach_request(Language::Hindi)]).await;

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Failed);
        assert!(st
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("please try again")));
        assert!(!st.session.processing_complete);
    }
}
