//! Builds the single instruction sent to the text-generation backend.
//!
//! The instruction names the language and the (lower-cased) style literally,
//! quotes the input verbatim and asks for the corrected text only:
//!
//! ```text
//! Correct the grammar and spelling of the following English text. Return only
//! the corrected text in a formal style.
//!
//! Text: "He go to school."
//! ```

use crate::correction::options::CorrectionConfig;

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Turns input text plus a [`CorrectionConfig`] into a correction instruction.
///
/// # Example
/// ```rust
/// use grammar_checker::correction::{CorrectionConfig, PromptBuilder};
///
/// let prompt = PromptBuilder::new(&CorrectionConfig::new("German", "Casual"))
///     .build("Ich habe gehen.");
/// assert!(prompt.contains("following German text"));
/// assert!(prompt.contains("in a casual style"));
/// ```
pub struct PromptBuilder<'a> {
    config: &'a CorrectionConfig,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(config: &'a CorrectionConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, text: &str) -> String {
        format!(
            "Correct the grammar and spelling of the following {language} text. \
             Return only the corrected text in a {style} style.\n\nText: \"{text}\"",
            language = self.config.language,
            style = self.config.style.prompt_name(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
