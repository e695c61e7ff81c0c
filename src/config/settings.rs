//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! API credentials are never stored in the TOML file; they are overlaid from
//! the process environment after loading (see [`AppConfig::with_env_credentials`]).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable holding the story-generation API key.
pub const GENERATION_KEY_ENV: &str = "TOGETHER_API_KEY";

/// Environment variable holding the optional captioning API token.
pub const CAPTION_KEY_ENV: &str = "HF_API_TOKEN";

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Settings for the remote story-generation backend.
///
/// Any OpenAI-compatible `/v1/chat/completions` provider works; the default
/// targets Together. Sampling values are deliberately unusual (high
/// temperature, tight top_k) — they shape the storytelling voice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of the API endpoint (no trailing `/v1`).
    pub base_url: String,
    /// API key — overlaid from `TOGETHER_API_KEY`, never persisted.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Word cap stated in the prompt; the model enforces it, not the client.
    pub max_words: u32,
    /// Maximum seconds to wait for the streamed response to finish.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.together.xyz".into(),
            api_key: None,
            model: "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo".into(),
            top_k: 5,
            top_p: 0.8,
            temperature: 1.5,
            max_words: 250,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// CaptionConfig
// ---------------------------------------------------------------------------

/// Settings for the image-captioning inference call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Base URL of the inference endpoint. Pointing this at a locally
    /// hosted inference server works the same way.
    pub base_url: String,
    /// API token — overlaid from `HF_API_TOKEN`, never persisted.
    /// `None` is fine for anonymous or local endpoints.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Image-to-text model identifier.
    pub model: String,
    /// Generation-length cap for the caption.
    pub max_new_tokens: u32,
    /// Maximum seconds to wait for a caption.
    pub timeout_secs: u64,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co".into(),
            api_key: None,
            model: "Salesforce/blip-image-captioning-base".into(),
            max_new_tokens: 20,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// TranslationConfig
// ---------------------------------------------------------------------------

/// Settings for the translation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Base URL of the translate endpoint.
    pub base_url: String,
    /// Maximum seconds to wait for one translation call.
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".into(),
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for speech synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the TTS endpoint.
    pub base_url: String,
    /// Maximum characters per synthesis request; longer text is split at
    /// whitespace and the resulting MP3 segments are merged.
    pub chunk_chars: usize,
    /// Maximum seconds to wait for one synthesis request.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com".into(),
            chunk_chars: 200,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance and saved UI choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// ISO code of the story language preselected on launch.
    pub default_language: String,
    /// Window size `(w, h)` in logical pixels.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_language: "en".into(),
            window_size: (960.0, 680.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use katha::config::AppConfig;
///
/// // Load (returns Default when file is missing), then pull credentials
/// // from the environment.
/// let config = AppConfig::load().unwrap().with_env_credentials();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Story-generation backend settings.
    pub generation: GenerationConfig,
    /// Image-captioning settings.
    pub caption: CaptionConfig,
    /// Translation settings.
    pub translation: TranslationConfig,
    /// Speech-synthesis settings.
    pub speech: SpeechConfig,
    /// UI settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overlay API credentials from the process environment.
    ///
    /// Empty values are treated as unset so a blank line in a `.env` file
    /// does not masquerade as a key.
    pub fn with_env_credentials(mut self) -> Self {
        self.generation.api_key = read_env_key(GENERATION_KEY_ENV);
        self.caption.api_key = read_env_key(CAPTION_KEY_ENV);
        self
    }
}

fn read_env_key(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
