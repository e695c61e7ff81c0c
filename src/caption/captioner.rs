//! Core `Captioner` trait and `BlipCaptioner` implementation.
//!
//! `BlipCaptioner` posts the image to an image-to-text inference endpoint
//! and returns the generated description. All connection details come from
//! [`CaptionConfig`]; pointing `base_url` at a locally hosted inference
//! server works identically.

use async_trait::async_trait;
use base64::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::config::CaptionConfig;

// ---------------------------------------------------------------------------
// CaptionError
// ---------------------------------------------------------------------------

/// Errors that can occur while captioning an image.
#[derive(Debug, Clone, Error)]
pub enum CaptionError {
    /// HTTP transport or connection error.
    #[error("caption request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("caption request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("caption backend returned HTTP {0}")]
    Status(u16),

    /// The response could not be parsed as expected JSON.
    #[error("failed to parse caption response: {0}")]
    Parse(String),

    /// The backend returned no usable description.
    #[error("caption backend returned an empty description")]
    Empty,
}

impl From<reqwest::Error> for CaptionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CaptionError::Timeout
        } else {
            CaptionError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Captioner trait
// ---------------------------------------------------------------------------

/// Async trait for image captioning backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Captioner>`).
///
/// # Contract
///
/// - `image` is the raw bytes of a jpg/jpeg/png file.
/// - The description is short — bounded by the backend's generation cap,
///   roughly twenty tokens.
/// - One invocation per call; no retries.
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, image: &[u8]) -> Result<String, CaptionError>;
}

// Compile-time assertion: Box<dyn Captioner> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Captioner>) {}
};

// ---------------------------------------------------------------------------
// BlipCaptioner
// ---------------------------------------------------------------------------

/// Wire shape of one inference-endpoint result entry.
#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Calls an image-to-text inference endpoint (BLIP by default).
pub struct BlipCaptioner {
    client: reqwest::Client,
    config: CaptionConfig,
}

impl BlipCaptioner {
    /// Build a `BlipCaptioner` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &CaptionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Extract the description from a parsed response body.
    ///
    /// The endpoint answers with a one-element array:
    /// `[{"generated_text": "a dog running on a beach"}]`.
    fn parse_response(body: &str) -> Result<String, CaptionError> {
        let entries: Vec<GeneratedText> =
            serde_json::from_str(body).map_err(|e| CaptionError::Parse(e.to_string()))?;

        let text = entries
            .first()
            .map(|e| e.generated_text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(CaptionError::Empty);
        }
        Ok(text)
    }
}

#[async_trait]
impl Captioner for BlipCaptioner {
    /// Send `image` to the configured endpoint and return its description.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is `Some(key)` and `key` is non-empty — anonymous
    /// and local endpoints need none.
    async fn caption(&self, image: &[u8]) -> Result<String, CaptionError> {
        let url = format!("{}/models/{}", self.config.base_url, self.config.model);

        let body = serde_json::json!({
            "inputs": BASE64_STANDARD.encode(image),
            "parameters": { "max_new_tokens": self.config.max_new_tokens }
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        Self::parse_response(&text)
    }
}

// ---------------------------------------------------------------------------
// MockCaptioner  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without any network.
#[cfg(test)]
pub struct MockCaptioner {
    response: Result<String, CaptionError>,
}

#[cfg(test)]
impl MockCaptioner {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: CaptionError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Captioner for MockCaptioner {
    async fn caption(&self, _image: &[u8]) -> Result<String, CaptionError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
