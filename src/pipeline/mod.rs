//! Correction pipeline: service call → highlighting → readability.
//!
//! This module wires the core together and exposes the shared state that the
//! UI reads every frame.
//!
//! # Architecture
//!
//! ```text
//! PipelineHandle::submit (UI thread, non-blocking)
//!        │  CorrectionCommand (mpsc)
//!        ▼
//! PipelineRunner::run()  ← async tokio task
//!        │
//!        └─ CorrectionPipeline::run
//!              ├─ CorrectionService::correct   (one backend call)
//!              ├─ analysis::highlight          (success only)
//!              └─ ReadabilityReport::analyze   (success only)
//!
//! SharedState (Arc<Mutex<SessionState>>) ←─── read by egui update() each frame
//! ```

pub mod correct;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use correct::{CorrectionPipeline, CorrectionResult, PipelineRun};
pub use runner::{CorrectionCommand, PipelineHandle, PipelineRunner, SubmitError, Submission};
pub use state::{lock_state, new_shared_state, SessionState, SharedState, PROCESSING_STATUS};
