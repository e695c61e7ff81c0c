//! Katha — image-to-story desktop application.
//!
//! Loads a user-picked image, captions it, weaves a short themed story
//! from the caption via a remote chat-completion API, translates the
//! result into one of ten languages, and synthesizes speech audio for the
//! translated text.
//!
//! # Module map
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | egui single-window UI |
//! | [`caption`] | image → description (remote inference call) |
//! | [`config`] | settings, paths, env credentials |
//! | [`language`] | supported story languages |
//! | [`pipeline`] | session orchestrator + shared state |
//! | [`prefs`] | the nine story-shaping preferences |
//! | [`speech`] | text → MP3 synthesis + local playback |
//! | [`story`] | prompt construction + streamed story generation |
//! | [`translate`] | text translation with pivot-language identity |

pub mod app;
pub mod caption;
pub mod config;
pub mod language;
pub mod pipeline;
pub mod prefs;
pub mod speech;
pub mod story;
pub mod translate;
