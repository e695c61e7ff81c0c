//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\katha\
//!   macOS:   ~/Library/Application Support/katha/
//!   Linux:   ~/.config/katha/
//!
//! Data dir (per-run artifacts):
//!   Windows: %LOCALAPPDATA%\katha\
//!   macOS:   ~/Library/Application Support/katha/
//!   Linux:   ~/.local/share/katha/
//!
//! The two artifact files live at fixed names and are overwritten by every
//! pipeline run — last writer wins. The app is single-session, so this is
//! acceptable; concurrent sessions would need per-run names here.

use std::path::{Path, PathBuf};

/// Fixed name of the uploaded-image artifact.
pub const IMAGE_FILE_NAME: &str = "uploaded_image.jpg";

/// Fixed name of the synthesized-audio artifact.
pub const AUDIO_FILE_NAME: &str = "story_audio.mp3";

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for per-run artifacts.
    pub data_dir: PathBuf,
    /// Full path of the uploaded-image artifact (overwritten per run).
    pub image_file: PathBuf,
    /// Full path of the synthesized-audio artifact (overwritten per run).
    pub audio_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "katha";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self::from_dirs(config_dir, data_dir)
    }

    /// Build paths under explicit directories (useful for tests).
    pub fn from_dirs(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        let settings_file = config_dir.join("settings.toml");
        let image_file = data_dir.join(IMAGE_FILE_NAME);
        let audio_file = data_dir.join(AUDIO_FILE_NAME);

        Self {
            config_dir,
            settings_file,
            data_dir,
            image_file,
            audio_file,
        }
    }

    /// Build paths with both directories rooted at `root` (test helper).
    pub fn rooted_at(root: &Path) -> Self {
        Self::from_dirs(root.join("config"), root.join("data"))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.data_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
    }

    #[test]
    fn artifact_files_use_fixed_names() {
        let paths = AppPaths::new();
        assert!(paths
            .image_file
            .file_name()
            .is_some_and(|n| n == IMAGE_FILE_NAME));
        assert!(paths
            .audio_file
            .file_name()
            .is_some_and(|n| n == AUDIO_FILE_NAME));
    }

    #[test]
    fn rooted_paths_stay_under_root() {
        let root = PathBuf::from("/tmp/katha-test-root");
        let paths = AppPaths::rooted_at(&root);
        assert!(paths.settings_file.starts_with(&root));
        assert!(paths.image_file.starts_with(&root));
        assert!(paths.audio_file.starts_with(&root));
    }
}
