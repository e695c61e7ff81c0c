//! Katha — egui/eframe application.
//!
//! # Architecture
//!
//! [`KathaApp`] is the top-level [`eframe::App`]. It owns the UI-side
//! inputs (image, preferences, language), a sender for [`StoryRequest`]s,
//! and a clone of the [`SharedState`] the orchestrator mutates. Every
//! frame it locks the shared state briefly, snapshots what it needs, and
//! renders:
//!
//! * a side panel with the image picker and the nine preference selectors,
//! * a central panel with the action button, a status line keyed to the
//!   current [`PipelineState`], and the results (caption, story, audio).
//!
//! Images arrive via a path entry box or by dropping a file onto the
//! window; jpg/jpeg/png only.

use std::path::PathBuf;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::language::{Language, ALL_LANGUAGES};
use crate::pipeline::{PipelineState, SharedState, StoryRequest, StorySession};
use crate::prefs::{
    PreferenceSet, ALL_CONFLICTS, ALL_ENDINGS, ALL_GENRES, ALL_PLOTS, ALL_REGIONS, ALL_SETTINGS,
    ALL_THEMES, ALL_TONES, ALL_TWISTS,
};
use crate::speech::AudioPlayer;

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Warm red — headings and primary actions.
const PRIMARY: egui::Color32 = egui::Color32::from_rgb(0xFF, 0x6B, 0x6B);
/// Turquoise — selection accents.
const SECONDARY: egui::Color32 = egui::Color32::from_rgb(0x4E, 0xCD, 0xC4);
/// Light gray page background.
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0xF7, 0xF7, 0xF7);
/// Dark blue-gray body text.
const TEXT: egui::Color32 = egui::Color32::from_rgb(0x2C, 0x3E, 0x50);
/// Non-fatal warning text.
const WARN: egui::Color32 = egui::Color32::from_rgb(0xB8, 0x86, 0x0B);

/// Image file extensions accepted by the picker.
const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.override_text_color = Some(TEXT);
    visuals.selection.bg_fill = SECONDARY;
    visuals.hyperlink_color = PRIMARY;
    ctx.set_visuals(visuals);
}

// ---------------------------------------------------------------------------
// KathaApp
// ---------------------------------------------------------------------------

/// eframe application — the story-weaving window.
pub struct KathaApp {
    // ── Inputs ───────────────────────────────────────────────────────────
    /// Path typed (or dropped) into the image picker.
    image_path: String,
    /// Loaded image: display name + raw bytes.
    loaded_image: Option<(String, Vec<u8>)>,
    /// Picker-level problem (bad extension, unreadable file).
    image_error: Option<String>,
    /// The nine story-shaping choices.
    prefs: PreferenceSet,
    /// Selected story language.
    language: Language,

    // ── Pipeline wiring ──────────────────────────────────────────────────
    /// Send run requests to the background orchestrator.
    request_tx: mpsc::Sender<StoryRequest>,
    /// Orchestrator-owned state, polled each frame.
    shared: SharedState,

    // ── Output ───────────────────────────────────────────────────────────
    /// MP3 playback; `None` when no output device is available.
    player: Option<AudioPlayer>,
}

impl KathaApp {
    /// Create a new [`KathaApp`].
    ///
    /// * `request_tx` — sender end of the pipeline request channel.
    /// * `shared`     — shared state mutated by the orchestrator.
    /// * `config`     — loaded application configuration (preselects the
    ///   story language).
    pub fn new(request_tx: mpsc::Sender<StoryRequest>, shared: SharedState, config: &AppConfig) -> Self {
        let language =
            Language::from_code(&config.ui.default_language).unwrap_or_default();

        let player = match AudioPlayer::try_default() {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("audio playback unavailable: {e}");
                None
            }
        };

        Self {
            image_path: String::new(),
            loaded_image: None,
            image_error: None,
            prefs: PreferenceSet::default(),
            language,
            request_tx,
            shared,
            player,
        }
    }

    // ── Image loading ────────────────────────────────────────────────────

    /// Validate the extension and read the file into memory.
    fn load_image(&mut self, path: PathBuf) {
        self.image_error = None;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            self.image_error = Some(format!(
                "Unsupported file type {extension:?} — use jpg, jpeg or png."
            ));
            return;
        }

        match std::fs::read(&path) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("image")
                    .to_string();
                log::info!("loaded image {name} ({} bytes)", bytes.len());
                self.loaded_image = Some((name, bytes));
                self.image_path = path.display().to_string();
            }
            Err(e) => {
                self.image_error = Some(format!("Could not read {}: {e}", path.display()));
            }
        }
    }

    /// Accept a file dropped anywhere onto the window.
    fn poll_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.into_iter().next() {
            if let Some(path) = file.path {
                self.load_image(path);
            }
        }
    }

    /// Send one run request; the orchestrator takes it from here.
    fn weave(&mut self) {
        let Some((_, bytes)) = &self.loaded_image else {
            return;
        };
        let request = StoryRequest {
            image: bytes.clone(),
            prefs: self.prefs,
            language: self.language,
        };
        if self.request_tx.try_send(request).is_err() {
            log::warn!("pipeline busy — request dropped");
        }
    }

    // ── Side panel: inputs ───────────────────────────────────────────────

    fn draw_image_picker(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Upload Your Magic Portal").color(PRIMARY).strong());
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.image_path)
                    .hint_text("path to a jpg / jpeg / png"),
            );
            if ui.button("Load").clicked() {
                self.load_image(PathBuf::from(self.image_path.trim()));
            }
        });
        ui.label(
            egui::RichText::new("…or drop an image onto the window")
                .size(11.0)
                .weak(),
        );

        if let Some((name, bytes)) = &self.loaded_image {
            ui.label(format!("Loaded: {name} ({} KiB)", bytes.len() / 1024));
        }
        if let Some(err) = &self.image_error {
            ui.colored_label(PRIMARY, err);
        }
    }

    fn draw_preferences(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Customize Your Tale").color(PRIMARY).strong());
        ui.add_space(4.0);

        egui::ComboBox::from_label("Region")
            .selected_text(self.prefs.region.label())
            .show_ui(ui, |ui| {
                for option in ALL_REGIONS {
                    ui.selectable_value(&mut self.prefs.region, option, option.label());
                }
            });

        egui::ComboBox::from_label("Genre")
            .selected_text(self.prefs.genre.label())
            .show_ui(ui, |ui| {
                for option in ALL_GENRES {
                    ui.selectable_value(&mut self.prefs.genre, option, option.label());
                }
            });

        egui::ComboBox::from_label("Setting")
            .selected_text(self.prefs.setting.label())
            .show_ui(ui, |ui| {
                for option in ALL_SETTINGS {
                    ui.selectable_value(&mut self.prefs.setting, option, option.label());
                }
            });

        egui::ComboBox::from_label("Plot")
            .selected_text(self.prefs.plot.label())
            .show_ui(ui, |ui| {
                for option in ALL_PLOTS {
                    ui.selectable_value(&mut self.prefs.plot, option, option.label());
                }
            });

        egui::ComboBox::from_label("Tone")
            .selected_text(self.prefs.tone.label())
            .show_ui(ui, |ui| {
                for option in ALL_TONES {
                    ui.selectable_value(&mut self.prefs.tone, option, option.label());
                }
            });

        egui::ComboBox::from_label("Theme")
            .selected_text(self.prefs.theme.label())
            .show_ui(ui, |ui| {
                for option in ALL_THEMES {
                    ui.selectable_value(&mut self.prefs.theme, option, option.label());
                }
            });

        egui::ComboBox::from_label("Conflict")
            .selected_text(self.prefs.conflict.label())
            .show_ui(ui, |ui| {
                for option in ALL_CONFLICTS {
                    ui.selectable_value(&mut self.prefs.conflict, option, option.label());
                }
            });

        egui::ComboBox::from_label("Mystery / Twist")
            .selected_text(self.prefs.twist.label())
            .show_ui(ui, |ui| {
                for option in ALL_TWISTS {
                    ui.selectable_value(&mut self.prefs.twist, option, option.label());
                }
            });

        egui::ComboBox::from_label("Ending")
            .selected_text(self.prefs.ending.label())
            .show_ui(ui, |ui| {
                for option in ALL_ENDINGS {
                    ui.selectable_value(&mut self.prefs.ending, option, option.label());
                }
            });
    }

    fn draw_language_selector(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Story Language").color(PRIMARY).strong());
        ui.add_space(4.0);
        egui::ComboBox::from_id_salt("story-language")
            .selected_text(self.language.label())
            .show_ui(ui, |ui| {
                for language in ALL_LANGUAGES {
                    ui.selectable_value(&mut self.language, language, language.label());
                }
            });
    }

    // ── Central panel: action, status, results ──────────────────────────

    fn draw_action_row(&mut self, ui: &mut egui::Ui, pipeline: PipelineState) {
        ui.horizontal(|ui| {
            let ready = self.loaded_image.is_some() && !pipeline.is_busy();
            let button = egui::Button::new(
                egui::RichText::new("Weave Your Story")
                    .color(egui::Color32::WHITE)
                    .strong(),
            )
            .fill(PRIMARY);

            if ui.add_enabled(ready, button).clicked() {
                self.weave();
            }

            if pipeline.is_busy() {
                ui.spinner();
                ui.label(format!("{}…", pipeline.label()));
            }
        });

        if self.loaded_image.is_none() {
            ui.label(
                egui::RichText::new("Load an image to begin.")
                    .size(11.0)
                    .weak(),
            );
        }
    }

    fn draw_results(&mut self, ui: &mut egui::Ui, session: &StorySession) {
        if let Some(caption) = session
            .caption_translated
            .as_deref()
            .or(session.caption.as_deref())
        {
            egui::CollapsingHeader::new("The Vision")
                .default_open(true)
                .show(ui, |ui| {
                    ui.label(caption);
                });
        }

        if !session.processing_complete {
            return;
        }

        if let Some(story) = session.story_translated.as_deref() {
            egui::CollapsingHeader::new("Your Tale Unfolds")
                .default_open(true)
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .max_height(280.0)
                        .show(ui, |ui| {
                            ui.label(story);
                        });
                });
        }

        // The player appears only when this run's audio really exists.
        let audio = session
            .audio_file_path
            .as_ref()
            .filter(|p| p.exists())
            .cloned();

        if let Some(path) = audio {
            ui.add_space(6.0);
            let language_label = self.language.label();
            match &mut self.player {
                Some(player) => {
                    ui.horizontal(|ui| {
                        ui.label(format!("Listen to the Magic ({language_label})"));
                        if player.is_playing() {
                            if ui.button("Stop").clicked() {
                                player.stop();
                            }
                        } else if ui.button("Play").clicked() {
                            if let Err(e) = player.play_file(&path) {
                                log::warn!("playback failed: {e}");
                            }
                        }
                    });
                }
                None => {
                    ui.label(
                        egui::RichText::new("Narration saved, but no audio output device found.")
                            .size(11.0)
                            .weak(),
                    );
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for KathaApp {
    /// Called every frame by eframe. Snapshots the shared state, then
    /// renders the inputs and results.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        apply_theme(ctx);
        self.poll_dropped_files(ctx);

        // Brief lock; never held across rendering.
        let (pipeline, session, warning, error_message) = {
            let st = self.shared.lock().unwrap();
            (
                st.pipeline,
                st.session.clone(),
                st.warning.clone(),
                st.error_message.clone(),
            )
        };

        // Keep polling while the orchestrator works or audio plays.
        if pipeline.is_busy() || self.player.as_ref().is_some_and(|p| p.is_playing()) {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::SidePanel::left("inputs")
            .resizable(false)
            .min_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading(egui::RichText::new("Enchanted Stories").color(PRIMARY));
                ui.add_space(8.0);

                self.draw_image_picker(ui);
                ui.separator();
                self.draw_preferences(ui);
                ui.separator();
                self.draw_language_selector(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.draw_action_row(ui, pipeline);
            ui.separator();

            if let Some(warning) = &warning {
                ui.colored_label(WARN, warning);
            }
            if let Some(error) = &error_message {
                ui.colored_label(PRIMARY, error);
            }

            self.draw_results(ui, &session);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(player) = &mut self.player {
            player.stop();
        }
        log::info!("Katha closing");
    }
}
