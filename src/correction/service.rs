//! Correction service: prompt in, [`CorrectionOutcome`] out.
//!
//! [`CorrectionService`] is stateless: it builds the instruction with
//! [`PromptBuilder`], makes exactly one [`ChatBackend::send_chat`] call and
//! folds any [`BackendError`](crate::correction::BackendError) into
//! [`CorrectionOutcome::Failure`].  Nothing is retried and no partial reply is
//! ever returned as a success.

use std::sync::Arc;

use crate::correction::backend::{ChatBackend, ChatMessage};
use crate::correction::options::CorrectionConfig;
use crate::correction::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// CorrectionOutcome
// ---------------------------------------------------------------------------

/// Result of one correction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionOutcome {
    /// The backend's reply with surrounding whitespace trimmed.
    Success { corrected_text: String },
    /// The backend could not be reached or answered unusably.
    Failure { message: String },
}

impl CorrectionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CorrectionOutcome::Success { .. })
    }

    /// The corrected text, or `None` on failure.
    pub fn corrected_text(&self) -> Option<&str> {
        match self {
            CorrectionOutcome::Success { corrected_text } => Some(corrected_text),
            CorrectionOutcome::Failure { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CorrectionService
// ---------------------------------------------------------------------------

/// Issues correction requests against a [`ChatBackend`].
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct CorrectionService {
    backend: Arc<dyn ChatBackend>,
    model: String,
}

impl CorrectionService {
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the backend to correct `text` in the given language and style.
    pub async fn correct(&self, text: &str, config: &CorrectionConfig) -> CorrectionOutcome {
        let prompt = PromptBuilder::new(config).build(text);
        let messages = [ChatMessage::user(prompt)];

        match self.backend.send_chat(&self.model, &messages).await {
            Ok(reply) => {
                let corrected_text = reply.trim().to_string();
                log::debug!(
                    "correction: {} chars in, {} chars out ({} / {})",
                    text.len(),
                    corrected_text.len(),
                    config.language,
                    config.style
                );
                CorrectionOutcome::Success { corrected_text }
            }
            Err(e) => {
                log::warn!("correction: backend failed: {e}");
                CorrectionOutcome::Failure {
                    message: e.to_string(),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
