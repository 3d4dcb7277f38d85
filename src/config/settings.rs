//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Missing sections or fields fall back to their defaults.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::correction::CorrectionConfig;

use super::AppPaths;

// ---------------------------------------------------------------------------
// BackendProvider
// ---------------------------------------------------------------------------

/// Wire protocol spoken by the correction backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackendProvider {
    /// Ollama's native `/api/chat` endpoint, no authentication.
    #[default]
    Ollama,
    /// Any OpenAI-compatible REST API (OpenAI, Groq, LM Studio …).
    OpenAiCompatible,
}

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Connection settings for the text-generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub provider: BackendProvider,
    /// Base URL of the API endpoint.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// Bearer token; only sent when non-empty.
    pub api_key: Option<String>,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature; left to the server's default when `None`.
    pub temperature: Option<f32>,
    /// Maximum seconds to wait for a reply.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "gemma3".into(),
            temperature: None,
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Text-to-speech program used for read-aloud.
///
/// An argument that is exactly `{text}` is replaced by the text; otherwise
/// the text is appended unless `append_text` is `false`.  The text is always
/// available to the program as `GRAMMAR_CHECKER_SPEECH_TEXT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub program: String,
    pub args: Vec<String>,
    pub append_text: bool,
}

impl Default for SpeechConfig {
    #[cfg(target_os = "windows")]
    fn default() -> Self {
        Self {
            program: "powershell".into(),
            args: vec![
                "-NoProfile".into(),
                "-NonInteractive".into(),
                "-Command".into(),
                "Add-Type -AssemblyName System.Speech; \
                 (New-Object System.Speech.Synthesis.SpeechSynthesizer)\
                 .Speak($env:GRAMMAR_CHECKER_SPEECH_TEXT)"
                    .into(),
            ],
            append_text: false,
        }
    }

    #[cfg(target_os = "macos")]
    fn default() -> Self {
        Self {
            program: "say".into(),
            args: vec!["{text}".into()],
            append_text: true,
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    fn default() -> Self {
        Self {
            program: "espeak-ng".into(),
            args: vec!["{text}".into()],
            append_text: true,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial window size `(width, height)` in logical pixels.
    pub window_size: (f32, f32),
    /// Where "Save" writes the corrected text.  `None` means
    /// [`AppPaths::default_export_file`].
    pub export_path: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (1100.0, 650.0),
            export_path: None,
        }
    }
}

impl UiConfig {
    /// The configured export path, or the platform default.
    pub fn resolved_export_path(&self) -> PathBuf {
        self.export_path
            .clone()
            .unwrap_or_else(|| AppPaths::new().default_export_file)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use grammar_checker::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Text-generation service settings.
    pub backend: BackendConfig,
    /// Language and style preselected in the window.
    pub correction: CorrectionConfig,
    /// Read-aloud program.
    pub speech: SpeechConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
