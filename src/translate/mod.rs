//! Translation module.
//!
//! This module provides:
//! * [`Translator`] — async trait implemented by translation backends.
//! * [`GtxTranslator`] — HTTP client for the Google translate `gtx` endpoint.
//! * [`TranslateError`] — error variants for translation operations.
//!
//! Translation is the one fail-soft stage of the pipeline: the orchestrator
//! catches every [`TranslateError`], records a warning, and continues with
//! the untranslated text. Translating into the pivot language (English) is
//! an identity pass that never makes a network call.

pub mod translator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use translator::{parse_translation, GtxTranslator, TranslateError, Translator};

#[cfg(test)]
pub use translator::MockTranslator;
