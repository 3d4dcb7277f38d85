//! Spoken playback of the corrected text.
//!
//! # Architecture
//!
//! ```text
//! PlaybackController ──init_engine()──▶ SpeechSynthesizer
//!        │                                   │
//!        │ owns exactly one                  ▼
//!        └──────────────────────────▶ Arc<dyn SpeechEngine>
//!                                      speak_and_wait()  (worker thread)
//!                                      stop()            (any thread)
//! ```
//!
//! [`SpeechSynthesizer`] creates engine instances; [`SpeechEngine`] speaks one
//! text and can be stopped from another thread while it does.  The
//! production synthesizer is [`CommandSynthesizer`], which drives a
//! text-to-speech program (`espeak-ng`, `say`, PowerShell SAPI).
//!
//! # Resume support
//!
//! Engines report [`SpeechEngine::supports_resume`].  The process-backed
//! engine does not support it, so pausing it ends playback.

pub mod command;
pub mod controller;

use std::sync::Arc;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use command::{CommandSynthesizer, SPEECH_TEXT_ENV};
pub use controller::{PlayOutcome, PlaybackController, PlaybackError, PlaybackSession, PlaybackState};

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpeechError {
    /// The text-to-speech program could not be found.
    #[error("speech program not found: {0}")]
    ProgramNotFound(String),

    /// The text-to-speech process could not be started.
    #[error("failed to start speech process: {0}")]
    Spawn(String),

    /// Speech started but ended abnormally.
    #[error("speech playback failed: {0}")]
    Playback(String),

    /// The engine cannot perform the requested operation.
    #[error("speech engine does not support {0}")]
    Unsupported(&'static str),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// One live speech-engine instance.
///
/// `speak_and_wait` blocks until speech finishes or [`stop`](Self::stop) is
/// called from another thread.  `stop` must be safe to call at any time,
/// including before speech started and after it ended.
pub trait SpeechEngine: Send + Sync {
    fn speak_and_wait(&self, text: &str) -> Result<(), SpeechError>;

    fn stop(&self);

    fn supports_resume(&self) -> bool {
        false
    }

    fn pause(&self) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported("pause"))
    }

    fn resume(&self) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported("resume"))
    }
}

/// Factory for [`SpeechEngine`] instances.
pub trait SpeechSynthesizer: Send + Sync {
    fn init_engine(&self) -> Result<Arc<dyn SpeechEngine>, SpeechError>;
}

// Compile-time assertion: both traits must stay object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechEngine>, _: Box<dyn SpeechSynthesizer>) {}
};
