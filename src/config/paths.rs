//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\grammar-checker\
//!   macOS:   ~/Library/Application Support/grammar-checker/
//!   Linux:   ~/.config/grammar-checker/
//!
//! Default export file: `corrected.txt` in the user's documents directory
//! (home directory when the platform has none).

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Where "Save" writes when no export path is configured.
    pub default_export_file: PathBuf,
}

impl AppPaths {
    pub const APP_NAME: &'static str = "grammar-checker";

    /// Resolves all paths using the `dirs` crate, falling back to the
    /// current directory when the platform cannot provide one.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let documents = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            default_export_file: documents.join("corrected.txt"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
