//! Application entry point — Katha.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load `.env` so API credentials reach the process environment.
//! 3. Load [`AppConfig`] from disk (returns default on first run) and
//!    overlay the environment credentials.
//! 4. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Build the pipeline backends behind their trait objects.
//! 6. Create shared state and the request channel.
//! 7. Spawn the story orchestrator on the tokio runtime.
//! 8. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use eframe::egui;
use tokio::sync::mpsc;

use katha::{
    app::KathaApp,
    caption::{BlipCaptioner, Captioner},
    config::{AppConfig, AppPaths, GENERATION_KEY_ENV},
    pipeline::{new_shared_state, StoryOrchestrator, StoryRequest},
    speech::{GoogleTts, SpeechSynthesizer},
    story::{ApiStoryGenerator, StoryGenerator},
    translate::{GtxTranslator, Translator},
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (w, h) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_inner_size([w, h])
        .with_min_inner_size([720.0, 480.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Katha starting up");

    // 2. Credentials from a local .env, when present
    if dotenvy::dotenv().is_ok() {
        log::debug!("loaded .env");
    }

    // 3. Configuration
    let config = AppConfig::load()
        .unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        })
        .with_env_credentials();

    if config.generation.api_key.is_none() {
        log::warn!(
            "{GENERATION_KEY_ENV} is not set — story generation will fail until it is provided"
        );
    }

    // 4. Tokio runtime (2 worker threads are plenty for one request at a time)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 5. Pipeline backends
    let captioner: Arc<dyn Captioner> = Arc::new(BlipCaptioner::from_config(&config.caption));
    let generator: Arc<dyn StoryGenerator> =
        Arc::new(ApiStoryGenerator::from_config(&config.generation));
    let translator: Arc<dyn Translator> = Arc::new(GtxTranslator::from_config(&config.translation));
    let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::new(GoogleTts::from_config(&config.speech));

    // 6. Shared state + request channel
    let state = new_shared_state();
    let (request_tx, request_rx) = mpsc::channel::<StoryRequest>(4);
    let paths = AppPaths::new();

    // 7. Spawn the orchestrator onto the tokio runtime
    {
        let orchestrator = StoryOrchestrator::new(
            Arc::clone(&state),
            paths,
            captioner,
            generator,
            translator,
            synthesizer,
        );
        rt.spawn(orchestrator.run(request_rx));
    }

    // 8. Build the egui app and run it (blocks until the window is closed)
    let app = KathaApp::new(request_tx, Arc::clone(&state), &config);
    let options = native_options(&config);

    eframe::run_native(
        "Katha — Enchanted Stories",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
