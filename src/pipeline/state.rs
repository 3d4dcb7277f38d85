//! Shared session state read by the UI every frame.
//!
//! [`SessionState`] is the single source of truth for the correction side of
//! the window: whether a request is in flight, the status line, and the last
//! completed [`CorrectionResult`].  The runner writes it, the UI reads it.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<SessionState>>`, cheap to
//! clone and safe to share across threads.  Lock it with [`lock_state`] for a
//! short critical section; never hold the lock across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::analysis::ReadabilityReport;
use crate::pipeline::correct::{CorrectionResult, PipelineRun};

/// Status line shown while a correction is in flight.
pub const PROCESSING_STATUS: &str = "Processing...";

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SessionState {
    busy: bool,
    status: Option<String>,
    last_result: Option<CorrectionResult>,
    /// Bumped every time the visible output changes (new result or clear).
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a correction request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn last_result(&self) -> Option<&CorrectionResult> {
        self.last_result.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Claim the session for a new request.
    ///
    /// Returns `false` (and changes nothing) when a request is already in
    /// flight; the caller must then drop the new request.
    pub fn try_begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.status = Some(PROCESSING_STATUS.to_string());
        true
    }

    /// Apply the outcome of a run and release the session.
    ///
    /// A completed run replaces the previous result as a whole; a no-op run
    /// leaves the output untouched.
    pub fn finish(&mut self, run: PipelineRun) {
        if let PipelineRun::Completed(result) = run {
            self.last_result = Some(result);
            self.generation += 1;
        }
        self.busy = false;
        self.status = None;
    }

    /// Forget the displayed result (the "Clear" action).
    pub fn clear_output(&mut self) {
        self.last_result = None;
        self.generation += 1;
    }

    /// Readability of the displayed output; all zero when there is none or
    /// the last run failed.
    pub fn readability(&self) -> ReadabilityReport {
        self.last_result
            .as_ref()
            .and_then(|r| r.readability)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
pub type SharedState = Arc<Mutex<SessionState>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(SessionState::new()))
}

/// Lock the shared state, recovering the data if a previous holder panicked.
pub fn lock_state(state: &SharedState) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
