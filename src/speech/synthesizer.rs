//! Core `SpeechSynthesizer` trait and `GoogleTts` implementation.
//!
//! `GoogleTts` fetches MP3 audio from the Google translate TTS endpoint.
//! The endpoint caps the text length per request, so longer text is split
//! at whitespace into bounded chunks and the fetched MP3 segments are
//! merged back to back — MP3 frames concatenate cleanly, so the merged
//! buffer plays as one continuous clip.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SpeechConfig;
use crate::language::Language;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors that can occur during speech synthesis.
#[derive(Debug, Clone, Error)]
pub enum SpeechError {
    /// There was nothing to synthesize.
    #[error("no text to synthesize")]
    EmptyText,

    /// HTTP transport or connection error.
    #[error("speech request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("speech request timed out")]
    Timeout,

    /// The backend answered with a non-success status (an unsupported
    /// language code surfaces this way).
    #[error("speech backend returned HTTP {0}")]
    Status(u16),

    /// The backend returned an empty body.
    #[error("speech backend returned no audio")]
    EmptyAudio,
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for speech-synthesis backends.
///
/// Implementations are responsible for provider-specific text-length
/// limits: splitting the text into batches where needed and merging the
/// audio chunks into one playable MP3 buffer. The caller persists the
/// returned bytes; the synthesizer never touches the filesystem.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, SpeechError>;
}

// Compile-time assertion: Box<dyn SpeechSynthesizer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechSynthesizer>) {}
};

// ---------------------------------------------------------------------------
// Text chunking
// ---------------------------------------------------------------------------

/// Split `text` into whitespace-delimited chunks of at most `max_chars`
/// characters.
///
/// Words never straddle a chunk boundary unless a single word exceeds the
/// limit, in which case that word alone is hard-split. Counted in `char`s,
/// not bytes — Indic scripts are multi-byte throughout.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        // Oversized word: flush, then hard-split it.
        if word_chars > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            let mut piece = String::new();
            let mut piece_chars = 0usize;
            for ch in word.chars() {
                if piece_chars == max_chars {
                    chunks.push(std::mem::take(&mut piece));
                    piece_chars = 0;
                }
                piece.push(ch);
                piece_chars += 1;
            }
            if !piece.is_empty() {
                chunks.push(piece);
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };

        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        } else {
            if !current.is_empty() {
                current.push(' ');
                current_chars += 1;
            }
            current.push_str(word);
            current_chars += word_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// ---------------------------------------------------------------------------
// GoogleTts
// ---------------------------------------------------------------------------

/// Fetches MP3 speech from the Google translate TTS endpoint
/// (`/translate_tts`).
pub struct GoogleTts {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl GoogleTts {
    /// Build a `GoogleTts` from application config.
    pub fn from_config(config: &SpeechConfig) -> Self {
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

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    /// Fetch speech for `text`, one request per chunk, and merge the MP3
    /// segments in order.
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, SpeechError> {
        let chunks = split_text(text, self.config.chunk_chars);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let url = format!("{}/translate_tts", self.config.base_url);
        let total = chunks.len();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let total_str = total.to_string();
            let idx_str = idx.to_string();
            let len_str = chunk.chars().count().to_string();

            let response = self
                .client
                .get(&url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language.code()),
                    ("q", chunk.as_str()),
                    ("total", total_str.as_str()),
                    ("idx", idx_str.as_str()),
                    ("textlen", len_str.as_str()),
                ])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SpeechError::Status(status.as_u16()));
            }

            let bytes = response.bytes().await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        log::debug!(
            "speech: {} bytes of MP3 from {} chunk(s) [{}]",
            audio.len(),
            total,
            language.code()
        );
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// MockSpeechSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns pre-configured audio bytes without any network.
#[cfg(test)]
pub struct MockSpeechSynthesizer {
    response: Result<Vec<u8>, SpeechError>,
}

#[cfg(test)]
impl MockSpeechSynthesizer {
    /// Create a mock that always returns `Ok(bytes)`.
    pub fn ok(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            response: Ok(bytes.into()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: SpeechError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize(&self, _text: &str, _language: Language) -> Result<Vec<u8>, SpeechError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- split_text ---

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = split_text("a dog running on a beach", 200);
        assert_eq!(chunks, vec!["a dog running on a beach"]);
    }

    #[test]
    fn chunks_respect_the_limit() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = split_text(text, 12);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 12, "{chunk:?} too long");
        }
    }

    #[test]
    fn words_are_not_split_across_chunks() {
        let text = "friendship loyalty courage";
        let chunks = split_text(text, 12);
        for chunk in &chunks {
            for word in chunk.split_whitespace() {
                assert!(text.contains(word));
            }
        }
        // Joining the chunks restores the exact word sequence.
        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn oversized_word_is_hard_split() {
        let text = "supercalifragilistic";
        let chunks = split_text(text, 8);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 8);
        }
    }

    #[test]
    fn limit_counts_chars_not_bytes() {
        // Each Devanagari char is 3 bytes; 4 words of 4 chars each.
        let text = "कहानी सुनो कहानी सुनो";
        let chunks = split_text(text, 11);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 11);
        }
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_text("", 200).is_empty());
        assert!(split_text("   \n\t ", 200).is_empty());
    }

    // ---- GoogleTts ---

    #[test]
    fn from_config_builds_without_panic() {
        let _tts = GoogleTts::from_config(&SpeechConfig::default());
    }

    /// Verify that `GoogleTts` is object-safe.
    #[test]
    fn synthesizer_is_object_safe() {
        let tts: Box<dyn SpeechSynthesizer> =
            Box::new(GoogleTts::from_config(&SpeechConfig::default()));
        drop(tts);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_request() {
        // Unroutable base_url: reaching the network would error differently.
        let tts = GoogleTts::from_config(&SpeechConfig {
            base_url: "http://127.0.0.1:1".into(),
            chunk_chars: 200,
            timeout_secs: 1,
        });
        let result = tts.synthesize("   ", Language::Hindi).await;
        assert!(matches!(result, Err(SpeechError::EmptyText)));
    }

    #[tokio::test]
    async fn mock_round_trips() {
        let tts = MockSpeechSynthesizer::ok(vec![1u8, 2, 3]);
        let bytes = tts.synthesize("text", Language::Hindi).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);

        let failing = MockSpeechSynthesizer::err(SpeechError::Status(404));
        assert!(failing.synthesize("text", Language::Hindi).await.is_err());
    }
}
