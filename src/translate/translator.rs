//! Core `Translator` trait and `GtxTranslator` implementation.
//!
//! `GtxTranslator` calls the public Google translate `gtx` endpoint —
//! text in, nested-array JSON out. The pivot language (English) never
//! reaches the network: source text is produced in English, so translating
//! into it is an identity pass.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::TranslationConfig;
use crate::language::Language;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur during translation.
///
/// All of these are non-fatal to the pipeline: the orchestrator falls back
/// to the untranslated text and records a warning.
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("translation request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("translation backend returned HTTP {0}")]
    Status(u16),

    /// The response body was not the expected nested-array JSON.
    #[error("failed to parse translation response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async trait for translation backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Translator>`).
///
/// # Contract
///
/// - When `target.is_pivot()` the input is returned unchanged and no
///   external call is made.
/// - Otherwise the backend is invoked exactly once; no retries.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> Result<String, TranslateError>;
}

// Compile-time assertion: Box<dyn Translator> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Translator>) {}
};

// ---------------------------------------------------------------------------
// GtxTranslator
// ---------------------------------------------------------------------------

/// Calls the Google translate `gtx` endpoint (`/translate_a/single`).
pub struct GtxTranslator {
    client: reqwest::Client,
    config: TranslationConfig,
}

impl GtxTranslator {
    /// Build a `GtxTranslator` from application config.
    pub fn from_config(config: &TranslationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

/// Concatenate the translated segments of a `gtx` response.
///
/// The endpoint answers with nested arrays; the outermost element 0 is a
/// list of segments, each of which holds the translated text at index 0:
///
/// ```text
/// [[["translated segment", "original segment", …], …], …]
/// ```
pub fn parse_translation(body: &Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Parse("missing segment list".into()))?;

    let mut out = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(Value::as_str) {
            out.push_str(text);
        }
    }

    if out.is_empty() {
        return Err(TranslateError::Parse("no translated segments".into()));
    }
    Ok(out)
}

#[async_trait]
impl Translator for GtxTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, TranslateError> {
        // Identity law: the pivot language never touches the network.
        if target.is_pivot() {
            return Ok(text.to_string());
        }

        let url = format!("{}/translate_a/single", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "en"),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        parse_translation(&body)
    }
}

// ---------------------------------------------------------------------------
// MockTranslator  (test-only)
// ---------------------------------------------------------------------------

/// A test double with a fixed response for non-pivot targets.
///
/// The pivot identity law is honoured so orchestrator tests observe the
/// same behaviour as with the real backend.
#[cfg(test)]
pub struct MockTranslator {
    response: Result<String, TranslateError>,
}

#[cfg(test)]
impl MockTranslator {
    /// Create a mock that translates everything to `text`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Create a mock whose backend always fails.
    pub fn err(error: TranslateError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, TranslateError> {
        if target.is_pivot() {
            return Ok(text.to_string());
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_translator() -> GtxTranslator {
        // Unroutable base_url: any attempted network call would error, which
        // is exactly what the identity tests rely on never happening.
        GtxTranslator::from_config(&TranslationConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 1,
        })
    }

    /// Identity law: translating into the pivot returns the input unchanged
    /// and performs no network call (the unroutable endpoint would fail).
    #[tokio::test]
    async fn pivot_target_is_identity_without_network() {
        let translator = make_translator();
        let text = "a dog running on a beach";
        let result = translator.translate(text, Language::English).await.unwrap();
        assert_eq!(result, text);
    }

    /// Non-pivot targets do reach the backend — with an unroutable endpoint
    /// that must surface as an error, not a silent identity.
    #[tokio::test]
    async fn non_pivot_target_contacts_backend() {
        let translator = make_translator();
        let result = translator.translate("hello", Language::Hindi).await;
        assert!(result.is_err());
    }

    #[test]
    fn parse_translation_concatenates_segments() {
        let body = json!([
            [
                ["नमस्ते ", "hello ", null],
                ["दुनिया", "world", null]
            ],
            null,
            "en"
        ]);
        assert_eq!(parse_translation(&body).unwrap(), "नमस्ते दुनिया");
    }

    #[test]
    fn parse_translation_skips_non_string_entries() {
        let body = json!([[["बिल्ली", "cat", null], [null, null]], null, "en"]);
        assert_eq!(parse_translation(&body).unwrap(), "बिल्ली");
    }

    #[test]
    fn parse_translation_rejects_unexpected_shape() {
        let body = json!({"error": "nope"});
        assert!(matches!(
            parse_translation(&body),
            Err(TranslateError::Parse(_))
        ));
    }

    #[test]
    fn parse_translation_rejects_empty_segments() {
        let body = json!([[], null, "en"]);
        assert!(matches!(
            parse_translation(&body),
            Err(TranslateError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn mock_honours_pivot_identity() {
        let translator = MockTranslator::ok("अनुवादित");
        let text = "original";
        assert_eq!(
            translator.translate(text, Language::English).await.unwrap(),
            text
        );
        assert_eq!(
            translator.translate(text, Language::Hindi).await.unwrap(),
            "अनुवादित"
        );
    }
}
