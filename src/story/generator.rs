//! Core `StoryGenerator` trait and streaming `ApiStoryGenerator`.
//!
//! `ApiStoryGenerator` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint with `stream: true` and concatenates the streamed fragments in
//! arrival order into one story. All connection details come from
//! [`GenerationConfig`]; nothing is hardcoded.
//!
//! The stream is a plain SSE body: one `data: {json}` frame per chunk,
//! terminated by `data: [DONE]`. [`parse_stream_line`] is the pure
//! per-line parser; the async loop just feeds it complete lines and
//! appends the fragments it yields.

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::Value;
use thiserror::Error;

use crate::config::GenerationConfig;
use crate::story::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// StoryError
// ---------------------------------------------------------------------------

/// Errors that can occur during story generation.
#[derive(Debug, Clone, Error)]
pub enum StoryError {
    /// HTTP transport or connection error.
    #[error("generation request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("generation request timed out")]
    Timeout,

    /// The API rejected the credential (HTTP 401/403).
    #[error("generation backend rejected the API key (HTTP {0})")]
    Auth(u16),

    /// The backend answered with another non-success status.
    #[error("generation backend returned HTTP {0}")]
    Status(u16),

    /// A streamed frame could not be parsed as expected JSON.
    #[error("failed to parse streamed response: {0}")]
    Parse(String),

    /// The stream finished without yielding any text.
    #[error("generation stream was empty")]
    EmptyStream,
}

impl From<reqwest::Error> for StoryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoryError::Timeout
        } else {
            StoryError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// StoryGenerator trait
// ---------------------------------------------------------------------------

/// Async trait for story-generation backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn StoryGenerator>`).
///
/// # Arguments
/// * `scene_prompt` – The composed prompt (caption + the nine preferences)
///   built by [`build_scene_prompt`](crate::story::build_scene_prompt).
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, scene_prompt: &str) -> Result<String, StoryError>;
}

// Compile-time assertion: Box<dyn StoryGenerator> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn StoryGenerator>) {}
};

// ---------------------------------------------------------------------------
// Stream parsing
// ---------------------------------------------------------------------------

/// One event decoded from a streamed response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment to append to the story.
    Fragment(String),
    /// The `[DONE]` sentinel — the stream is complete.
    Done,
}

/// Decode one SSE line from the chat-completion stream.
///
/// Returns `None` for lines that carry no text: blank keep-alives, SSE
/// comments, and delta frames without `content` (e.g. the initial
/// role-only delta or the final finish-reason frame).
pub fn parse_stream_line(line: &str) -> Result<Option<StreamEvent>, StoryError> {
    let line = line.trim();

    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let payload = payload.trim();

    if payload == "[DONE]" {
        return Ok(Some(StreamEvent::Done));
    }
    if payload.is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(payload).map_err(|e| StoryError::Parse(e.to_string()))?;

    match value["choices"][0]["delta"]["content"].as_str() {
        Some(fragment) if !fragment.is_empty() => {
            Ok(Some(StreamEvent::Fragment(fragment.to_string())))
        }
        _ => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// ApiStoryGenerator
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint with a
/// streamed response.
///
/// Works with: Together, OpenAI, Groq, LM Studio, vLLM — any provider that
/// speaks the OpenAI chat-completions wire format.
pub struct ApiStoryGenerator {
    client: reqwest::Client,
    config: GenerationConfig,
    prompt_builder: PromptBuilder,
}

impl ApiStoryGenerator {
    /// Build an `ApiStoryGenerator` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &GenerationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let prompt_builder = PromptBuilder::new(config.max_words);

        Self {
            client,
            config: config.clone(),
            prompt_builder,
        }
    }
}

#[async_trait]
impl StoryGenerator for ApiStoryGenerator {
    /// Request a streamed completion and concatenate its fragments.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is `Some(key)` and `key` is non-empty. The word
    /// cap is enforced by the prompt, never by local truncation.
    async fn generate(&self, scene_prompt: &str) -> Result<String, StoryError> {
        let (system_msg, user_msg) = self.prompt_builder.build_chat(scene_prompt);

        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      true,
            "top_k":       self.config.top_k,
            "top_p":       self.config.top_p,
            "temperature": self.config.temperature
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(StoryError::Auth(status.as_u16()));
        }
        if !status.is_success() {
            return Err(StoryError::Status(status.as_u16()));
        }

        // Sequentially consume the byte stream, cutting it into lines and
        // feeding each complete line to the parser. Fragments accumulate
        // into the story in arrival order.
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut story = String::new();
        let mut done = false;

        'outer: while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                match parse_stream_line(&line)? {
                    Some(StreamEvent::Fragment(fragment)) => story.push_str(&fragment),
                    Some(StreamEvent::Done) => {
                        done = true;
                        break 'outer;
                    }
                    None => {}
                }
            }
        }

        // A final line without a trailing newline still counts.
        if !done && !buffer.is_empty() {
            if let Some(StreamEvent::Fragment(fragment)) = parse_stream_line(&buffer)? {
                story.push_str(&fragment);
            }
        }

        let story = story.trim().to_string();
        if story.is_empty() {
            return Err(StoryError::EmptyStream);
        }

        log::debug!("generation: {} chars streamed", story.len());
        Ok(story)
    }
}

// ---------------------------------------------------------------------------
// MockStoryGenerator  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured story without any network.
#[cfg(test)]
pub struct MockStoryGenerator {
    response: Result<String, StoryError>,
}

#[cfg(test)]
impl MockStoryGenerator {
    /// Create a mock that always returns `Ok(story)`.
    pub fn ok(story: impl Into<String>) -> Self {
        Self {
            response: Ok(story.into()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: StoryError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl StoryGenerator for MockStoryGenerator {
    async fn generate(&self, _scene_prompt: &str) -> Result<String, StoryError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- parse_stream_line ---

    #[test]
    fn fragment_line_yields_text() {
        let line = r#"data: {"choices":[{"delta":{"content":"Once upon"}}]}"#;
        assert_eq!(
            parse_stream_line(line).unwrap(),
            Some(StreamEvent::Fragment("Once upon".into()))
        );
    }

    #[test]
    fn done_sentinel_terminates() {
        assert_eq!(
            parse_stream_line("data: [DONE]").unwrap(),
            Some(StreamEvent::Done)
        );
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_stream_line("").unwrap(), None);
        assert_eq!(parse_stream_line("   ").unwrap(), None);
        assert_eq!(parse_stream_line(": keep-alive").unwrap(), None);
    }

    #[test]
    fn role_only_delta_is_skipped() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_stream_line(line).unwrap(), None);
    }

    #[test]
    fn finish_frame_without_content_is_skipped() {
        let line = r#"data: {"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_stream_line(line).unwrap(), None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_stream_line("data: {not json"),
            Err(StoryError::Parse(_))
        ));
    }

    /// Fragments concatenate in arrival order — the whole streamed-response
    /// contract, reduced to its pure core.
    #[test]
    fn fragments_concatenate_sequentially() {
        let lines = [
            r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#,
            r#"data: {"choices":[{"delta":{"content":"Under the "}}]}"#,
            "",
            r#"data: {"choices":[{"delta":{"content":"banyan tree, "}}]}"#,
            r#"data: {"choices":[{"delta":{"content":"a dog waited."}}]}"#,
            r#"data: [DONE]"#,
        ];

        let mut story = String::new();
        for line in lines {
            match parse_stream_line(line).unwrap() {
                Some(StreamEvent::Fragment(f)) => story.push_str(&f),
                Some(StreamEvent::Done) => break,
                None => {}
            }
        }

        assert_eq!(story, "Under the banyan tree, a dog waited.");
    }

    // ---- construction ---

    #[test]
    fn from_config_builds_without_panic() {
        let _generator = ApiStoryGenerator::from_config(&GenerationConfig::default());
    }

    /// Verify that `ApiStoryGenerator` is object-safe.
    #[test]
    fn generator_is_object_safe() {
        let generator: Box<dyn StoryGenerator> =
            Box::new(ApiStoryGenerator::from_config(&GenerationConfig::default()));
        drop(generator);
    }

    #[tokio::test]
    async fn mock_round_trips() {
        let generator = MockStoryGenerator::ok("A short tale.");
        assert_eq!(generator.generate("prompt").await.unwrap(), "A short tale.");

        let failing = MockStoryGenerator::err(StoryError::Auth(401));
        assert!(matches!(
            failing.generate("prompt").await,
            Err(StoryError::Auth(401))
        ));
    }
}
