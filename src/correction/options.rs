//! Per-request correction options.
//!
//! [`Language`] and [`WritingStyle`] are open enumerations: the well-known
//! values have dedicated variants (and appear in the UI drop-downs), anything
//! else is carried verbatim in `Other`.  Both serialise as plain strings so a
//! `settings.toml` can say `language = "Portuguese"`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Language of the text being corrected, embedded literally in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Other(String),
}

impl Language {
    /// Languages offered in the language picker, in display order.
    pub const KNOWN: [Language; 4] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Other(name) => name,
        }
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        let s = s.trim();
        Self::KNOWN
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(s))
            .cloned()
            .unwrap_or_else(|| Language::Other(s.to_string()))
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Language::from(s.as_str())
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.as_str().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WritingStyle
// ---------------------------------------------------------------------------

/// Register the corrected text should be written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WritingStyle {
    #[default]
    Default,
    Formal,
    Academic,
    Casual,
    Professional,
    Other(String),
}

impl WritingStyle {
    /// Styles offered in the style picker, in display order.
    pub const KNOWN: [WritingStyle; 5] = [
        WritingStyle::Default,
        WritingStyle::Formal,
        WritingStyle::Academic,
        WritingStyle::Casual,
        WritingStyle::Professional,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            WritingStyle::Default => "Default",
            WritingStyle::Formal => "Formal",
            WritingStyle::Academic => "Academic",
            WritingStyle::Casual => "Casual",
            WritingStyle::Professional => "Professional",
            WritingStyle::Other(name) => name,
        }
    }

    /// Lower-cased name, as it appears inside the correction prompt.
    pub fn prompt_name(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl From<&str> for WritingStyle {
    fn from(s: &str) -> Self {
        let s = s.trim();
        Self::KNOWN
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(s))
            .cloned()
            .unwrap_or_else(|| WritingStyle::Other(s.to_string()))
    }
}

impl From<String> for WritingStyle {
    fn from(s: String) -> Self {
        WritingStyle::from(s.as_str())
    }
}

impl From<WritingStyle> for String {
    fn from(style: WritingStyle) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for WritingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CorrectionConfig / CorrectionRequest
// ---------------------------------------------------------------------------

/// Language and style for one correction request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    pub language: Language,
    pub style: WritingStyle,
}

impl CorrectionConfig {
    pub fn new(language: impl Into<Language>, style: impl Into<WritingStyle>) -> Self {
        Self {
            language: language.into(),
            style: style.into(),
        }
    }
}

/// A validated request: the source text is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRequest {
    source_text: String,
    config: CorrectionConfig,
}

impl CorrectionRequest {
    /// Returns `None` when `raw` is empty or whitespace only.
    pub fn new(raw: &str, config: CorrectionConfig) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            source_text: trimmed.to_string(),
            config,
        })
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_parse_case_insensitively() {
        assert_eq!(Language::from("spanish"), Language::Spanish);
        assert_eq!(Language::from(" GERMAN "), Language::German);
        assert_eq!(WritingStyle::from("academic"), WritingStyle::Academic);
    }

    #[test]
    fn unknown_names_are_kept_verbatim() {
        assert_eq!(
            Language::from("Portuguese"),
            Language::Other("Portuguese".into())
        );
        assert_eq!(Language::from("Portuguese").as_str(), "Portuguese");
        assert_eq!(
            WritingStyle::from("Poetic").to_string(),
            "Poetic".to_string()
        );
    }

    #[test]
    fn prompt_name_is_lower_case() {
        assert_eq!(WritingStyle::Professional.prompt_name(), "professional");
        assert_eq!(WritingStyle::Other("Very Terse".into()).prompt_name(), "very terse");
    }

    #[test]
    fn defaults_are_english_and_default_style() {
        let cfg = CorrectionConfig::default();
        assert_eq!(cfg.language, Language::English);
        assert_eq!(cfg.style, WritingStyle::Default);
    }

    #[test]
    fn serialises_as_plain_strings() {
        let cfg = CorrectionConfig::new("French", "Casual");
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(json, r#"{"language":"French","style":"Casual"}"#);

        let back: CorrectionConfig =
            serde_json::from_str(r#"{"language":"Klingon","style":"formal"}"#).unwrap();
        assert_eq!(back.language, Language::Other("Klingon".into()));
        assert_eq!(back.style, WritingStyle::Formal);
    }

    #[test]
    fn request_rejects_blank_text() {
        assert!(CorrectionRequest::new("", CorrectionConfig::default()).is_none());
        assert!(CorrectionRequest::new(" \n\t ", CorrectionConfig::default()).is_none());
    }

    #[test]
    fn request_trims_source_text() {
        let req = CorrectionRequest::new("  He go to school. \n", CorrectionConfig::default())
            .unwrap();
        assert_eq!(req.source_text(), "He go to school.");
        assert_eq!(req.config().language, Language::English);
    }
}
