//! Pipeline runner: executes correction requests off the UI thread.
//!
//! [`PipelineHandle`] is held by the UI.  [`PipelineHandle::submit`] claims
//! the session (see [`SessionState::try_begin`](crate::pipeline::SessionState::try_begin)) and sends a
//! [`CorrectionCommand`] over a `tokio::sync::mpsc` channel without blocking.
//!
//! [`PipelineRunner`] owns the receiving end inside a tokio task, awaits the
//! backend call and writes the finished run into the [`SharedState`] in a
//! single critical section, so the UI never sees a half-updated result.
//!
//! ```text
//! UI thread                         tokio task
//! ─────────                         ──────────
//! submit() ─try_begin─▶ busy
//!          ─Correct{..}──────────▶  CorrectionPipeline::run().await
//!                                   lock ▶ finish(run) ▶ unlock
//! update() ◀──── reads SharedState every frame
//! ```

use thiserror::Error;
use tokio::sync::mpsc;

use crate::correction::CorrectionConfig;

use super::correct::{CorrectionPipeline, PipelineRun};
use super::state::{lock_state, SharedState};

// ---------------------------------------------------------------------------
// Commands and errors
// ---------------------------------------------------------------------------

/// Requests sent from the UI to the runner.
#[derive(Debug, Clone)]
pub enum CorrectionCommand {
    Correct {
        text: String,
        config: CorrectionConfig,
    },
}

/// What [`PipelineHandle::submit`] did with the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The request is on its way to the runner.
    Queued,
    /// The text was blank; nothing was sent and the state is unchanged.
    Blank,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Another correction is still in flight.
    #[error("a correction is already in progress")]
    Busy,

    /// The runner task is gone (or its queue is full).
    #[error("correction runner is not available")]
    Unavailable,
}

// ---------------------------------------------------------------------------
// PipelineHandle
// ---------------------------------------------------------------------------

/// UI-side handle: submits requests and exposes the shared state.
#[derive(Clone)]
pub struct PipelineHandle {
    state: SharedState,
    tx: mpsc::Sender<CorrectionCommand>,
}

impl PipelineHandle {
    pub fn new(state: SharedState, tx: mpsc::Sender<CorrectionCommand>) -> Self {
        Self { state, tx }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Queue a correction of `text` without blocking.
    pub fn submit(&self, text: &str, config: CorrectionConfig) -> Result<Submission, SubmitError> {
        if text.trim().is_empty() {
            return Ok(Submission::Blank);
        }

        if !lock_state(&self.state).try_begin() {
            log::warn!("runner: rejected request while another is in flight");
            return Err(SubmitError::Busy);
        }

        let cmd = CorrectionCommand::Correct {
            text: text.to_string(),
            config,
        };
        if let Err(e) = self.tx.try_send(cmd) {
            log::warn!("runner: could not queue request: {e}");
            lock_state(&self.state).finish(PipelineRun::NoOp);
            return Err(SubmitError::Unavailable);
        }

        Ok(Submission::Queued)
    }
}

// ---------------------------------------------------------------------------
// PipelineRunner
// ---------------------------------------------------------------------------

/// Drives [`CorrectionPipeline`] runs received over the command channel.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use grammar_checker::config::AppConfig;
/// use grammar_checker::correction::{ApiBackend, CorrectionService};
/// use grammar_checker::pipeline::{new_shared_state, CorrectionPipeline, PipelineHandle, PipelineRunner};
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let service = CorrectionService::new(
///     Arc::new(ApiBackend::from_config(&config.backend)),
///     config.backend.model.clone(),
/// );
/// let state = new_shared_state();
/// let (tx, rx) = tokio::sync::mpsc::channel(8);
///
/// let runner = PipelineRunner::new(state.clone(), CorrectionPipeline::new(service));
/// tokio::spawn(runner.run(rx));
///
/// let handle = PipelineHandle::new(state, tx);
/// handle.submit("He go to school.", Default::default()).unwrap();
/// # }
/// ```
pub struct PipelineRunner {
    state: SharedState,
    pipeline: CorrectionPipeline,
}

impl PipelineRunner {
    pub fn new(state: SharedState, pipeline: CorrectionPipeline) -> Self {
        Self { state, pipeline }
    }

    /// Run until every [`PipelineHandle`] (sender) has been dropped.
    pub async fn run(self, mut command_rx: mpsc::Receiver<CorrectionCommand>) {
        log::info!("runner: started");

        while let Some(cmd) = command_rx.recv().await {
            match cmd {
                CorrectionCommand::Correct { text, config } => {
                    let run = self.pipeline.run(&text, &config).await;
                    lock_state(&self.state).finish(run);
                }
            }
        }

        log::info!("runner: command channel closed, shutting down");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
