//! One correction run: service call, then highlighting and readability.
//!
//! ```text
//! raw text ──trim──▶ empty? ──yes──▶ PipelineRun::NoOp
//!                      │
//!                      no
//!                      ▼
//!             CorrectionService::correct
//!                ├─ Failure ──▶ "Error: <message>", no spans, no report
//!                └─ Success ──▶ highlight(trimmed, corrected)
//!                               ReadabilityReport::analyze(corrected)
//! ```
//!
//! The pipeline keeps no state between runs.  Callers that share output
//! state across runs must not overlap them (see [`SessionState::try_begin`]).
//!
//! [`SessionState::try_begin`]: crate::pipeline::SessionState::try_begin

use crate::analysis::{highlight, DiffSpan, ReadabilityReport};
use crate::correction::{CorrectionConfig, CorrectionOutcome, CorrectionRequest, CorrectionService};

// ---------------------------------------------------------------------------
// CorrectionResult / PipelineRun
// ---------------------------------------------------------------------------

/// Everything the front end needs to render one completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionResult {
    /// The trimmed input the correction was requested for.
    pub source_text: String,
    pub outcome: CorrectionOutcome,
    /// Changed regions of the corrected text; empty on failure.
    pub spans: Vec<DiffSpan>,
    /// Statistics of the corrected text; `None` on failure.
    pub readability: Option<ReadabilityReport>,
}

impl CorrectionResult {
    /// Text to show in the output pane: the corrected text, or the
    /// `"Error: …"` message.
    pub fn display_text(&self) -> &str {
        match &self.outcome {
            CorrectionOutcome::Success { corrected_text } => corrected_text,
            CorrectionOutcome::Failure { message } => message,
        }
    }
}

/// What [`CorrectionPipeline::run`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineRun {
    /// The input was blank; no request was made and nothing should change.
    NoOp,
    Completed(CorrectionResult),
}

// ---------------------------------------------------------------------------
// CorrectionPipeline
// ---------------------------------------------------------------------------

/// Orchestrates a correction and its analysis.
#[derive(Clone)]
pub struct CorrectionPipeline {
    service: CorrectionService,
}

impl CorrectionPipeline {
    pub fn new(service: CorrectionService) -> Self {
        Self { service }
    }

    pub async fn run(&self, raw_text: &str, config: &CorrectionConfig) -> PipelineRun {
        let Some(request) = CorrectionRequest::new(raw_text, config.clone()) else {
            log::debug!("pipeline: blank input, nothing to do");
            return PipelineRun::NoOp;
        };

        let outcome = self
            .service
            .correct(request.source_text(), request.config())
            .await;

        let result = match outcome {
            CorrectionOutcome::Success { corrected_text } => {
                let spans = highlight(request.source_text(), &corrected_text);
                let readability = ReadabilityReport::analyze(&corrected_text);
                log::debug!(
                    "pipeline: {} changed region(s), {}",
                    spans.len(),
                    readability
                );
                CorrectionResult {
                    source_text: request.source_text().to_string(),
                    outcome: CorrectionOutcome::Success { corrected_text },
                    spans,
                    readability: Some(readability),
                }
            }
            CorrectionOutcome::Failure { message } => CorrectionResult {
                source_text: request.source_text().to_string(),
                outcome: CorrectionOutcome::Failure {
                    message: format!("Error: {message}"),
                },
                spans: Vec::new(),
                readability: None,
            },
        };

        PipelineRun::Completed(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::correction::{BackendError, ChatBackend, ChatMessage, Language, WritingStyle};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Answers every call with a fixed reply and counts the calls.
    pub(crate) struct StubBackend {
        reply: Result<String, String>,
        pub(crate) calls: AtomicUsize,
    }

    impl StubBackend {
        pub(crate) fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for StubBackend {
        async fn send_chat(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
        ) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(BackendError::Request)
        }
    }

    pub(crate) fn pipeline_with(backend: Arc<StubBackend>) -> CorrectionPipeline {
        CorrectionPipeline::new(CorrectionService::new(backend, "gemma3"))
    }

    fn english_formal() -> CorrectionConfig {
        CorrectionConfig::new(Language::English, WritingStyle::Formal)
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn blank_input_is_noop_without_backend_call() {
        let backend = Arc::new(StubBackend::ok("unused"));
        let pipeline = pipeline_with(backend.clone());

        assert_eq!(pipeline.run("", &english_formal()).await, PipelineRun::NoOp);
        assert_eq!(pipeline.run("  \n ", &english_formal()).await, PipelineRun::NoOp);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_bundles_spans_and_readability() {
        let backend = Arc::new(StubBackend::ok("He goes to school."));
        let pipeline = pipeline_with(backend.clone());

        let PipelineRun::Completed(result) =
            pipeline.run("He go to school.", &english_formal()).await
        else {
            panic!("expected a completed run");
        };

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert!(result.outcome.is_success());
        assert_eq!(result.display_text(), "He goes to school.");
        assert_eq!(result.spans, vec![DiffSpan::new(3, 8)]);

        let report = result.readability.expect("report on success");
        assert_eq!(report.word_count, 4);
        assert!((report.grade_level - (-2.23)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn input_is_trimmed_before_diffing() {
        let backend = Arc::new(StubBackend::ok("Fine as is."));
        let pipeline = pipeline_with(backend);

        let PipelineRun::Completed(result) =
            pipeline.run("\n  Fine as is.  \n", &english_formal()).await
        else {
            panic!("expected a completed run");
        };
        assert_eq!(result.source_text, "Fine as is.");
        assert!(result.spans.is_empty());
    }

    #[tokio::test]
    async fn failure_is_prefixed_and_skips_analysis() {
        let backend = Arc::new(StubBackend::failing("connection refused"));
        let pipeline = pipeline_with(backend);

        let PipelineRun::Completed(result) = pipeline.run("text", &english_formal()).await
        else {
            panic!("expected a completed run");
        };

        let CorrectionOutcome::Failure { message } = &result.outcome else {
            panic!("expected a failure outcome");
        };
        assert!(message.starts_with("Error: "));
        assert_eq!(result.display_text(), "Error: HTTP request failed: connection refused");
        assert!(result.spans.is_empty());
        assert!(result.readability.is_none());
    }
}
