//! Grammar and style correction through a text-generation backend.
//!
//! This module provides:
//! * [`ChatBackend`]: async trait for a single-turn chat call.
//! * [`ApiBackend`]: HTTP implementation for Ollama and OpenAI-compatible APIs.
//! * [`PromptBuilder`]: builds the correction instruction.
//! * [`CorrectionService`]: one prompt, one call, one [`CorrectionOutcome`].
//! * [`Language`] / [`WritingStyle`] / [`CorrectionConfig`]: request options.
//! * [`BackendError`]: error variants for backend calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use grammar_checker::config::AppConfig;
//! use grammar_checker::correction::{ApiBackend, CorrectionConfig, CorrectionService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let service = CorrectionService::new(
//!         Arc::new(ApiBackend::from_config(&config.backend)),
//!         config.backend.model.clone(),
//!     );
//!
//!     let outcome = service
//!         .correct("He go to school.", &CorrectionConfig::new("English", "Formal"))
//!         .await;
//!     println!("{outcome:?}");
//! }
//! ```

pub mod backend;
pub mod options;
pub mod prompt;
pub mod service;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use backend::{ApiBackend, BackendError, ChatBackend, ChatMessage, ChatRole};
pub use options::{CorrectionConfig, CorrectionRequest, Language, WritingStyle};
pub use prompt::PromptBuilder;
pub use service::{CorrectionOutcome, CorrectionService};
