//! Image-captioning module.
//!
//! This module provides:
//! * [`Captioner`] — async trait implemented by captioning backends.
//! * [`BlipCaptioner`] — HTTP client for an image-to-text inference endpoint.
//! * [`CaptionError`] — error variants for captioning operations.
//!
//! The pipeline holds the captioner behind `Arc<dyn Captioner>` and calls it
//! exactly once per run with the raw bytes of the uploaded image.

pub mod captioner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use captioner::{BlipCaptioner, CaptionError, Captioner};

// test-only re-export so the pipeline test module can import MockCaptioner
// without `use katha::caption::captioner::MockCaptioner`.
#[cfg(test)]
pub use captioner::MockCaptioner;
