//! Supported story languages.
//!
//! English is the pivot language: captions and stories are produced in
//! English first, and translation into the pivot is an identity pass that
//! never touches the network.

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// The ten languages the app can deliver a story in.
///
/// The config stores only the ISO code of the default language; see
/// [`Language::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Hindi,
    Tamil,
    Telugu,
    Malayalam,
    Kannada,
    Bengali,
    Gujarati,
    Marathi,
    Punjabi,
}

/// All languages in UI display order (pivot first).
pub const ALL_LANGUAGES: [Language; 10] = [
    Language::English,
    Language::Hindi,
    Language::Tamil,
    Language::Telugu,
    Language::Malayalam,
    Language::Kannada,
    Language::Bengali,
    Language::Gujarati,
    Language::Marathi,
    Language::Punjabi,
];

impl Language {
    /// ISO-639-1 code sent to translation and speech backends.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Malayalam => "ml",
            Language::Kannada => "kn",
            Language::Bengali => "bn",
            Language::Gujarati => "gu",
            Language::Marathi => "mr",
            Language::Punjabi => "pa",
        }
    }

    /// Native-script label shown in the language selector.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी (Hindi)",
            Language::Tamil => "தமிழ் (Tamil)",
            Language::Telugu => "తెలుగు (Telugu)",
            Language::Malayalam => "മലയാളം (Malayalam)",
            Language::Kannada => "ಕನ್ನಡ (Kannada)",
            Language::Bengali => "বাংলা (Bengali)",
            Language::Gujarati => "ગુજરાતી (Gujarati)",
            Language::Marathi => "मराठी (Marathi)",
            Language::Punjabi => "ਪੰਜਾਬੀ (Punjabi)",
        }
    }

    /// `true` for the pivot language (English) — translation is a no-op.
    pub fn is_pivot(&self) -> bool {
        matches!(self, Language::English)
    }

    /// Look a language up by its ISO code (used when restoring the saved
    /// default from config).
    pub fn from_code(code: &str) -> Option<Self> {
        ALL_LANGUAGES.iter().copied().find(|l| l.code() == code)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_english_is_pivot() {
        for lang in ALL_LANGUAGES {
            assert_eq!(lang.is_pivot(), lang == Language::English);
        }
    }

    #[test]
    fn codes_are_unique() {
        for a in ALL_LANGUAGES {
            for b in ALL_LANGUAGES {
                if a != b {
                    assert_ne!(a.code(), b.code());
                }
            }
        }
    }

    #[test]
    fn from_code_round_trips() {
        for lang in ALL_LANGUAGES {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("xx"), None);
    }

    #[test]
    fn default_is_english() {
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn hindi_label_carries_native_script() {
        assert!(Language::Hindi.label().contains("हिंदी"));
        assert_eq!(Language::Hindi.code(), "hi");
    }
}
