//! Configuration module for the grammar checker.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the backend,
//! default correction options, speech program and window, `AppPaths` for
//! cross-platform directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, BackendConfig, BackendProvider, SpeechConfig, UiConfig};
