//! Playback state machine guarding a single speech-engine instance.
//!
//! ```text
//!            play                       natural finish / stop
//! Idle ─────────────▶ Playing ────────────────────────────────▶ Idle
//!  ▲                   │  ▲ │
//!  │            pause* │  │ │ speech error
//!  │                   ▼  │ ▼
//!  └──── stop ──── Paused  Stopped ──play──▶ Playing (fresh engine)
//!                    │  play (resume)
//!                    └────▶ Playing
//! ```
//!
//! `*` Only engines that report `supports_resume()` can be paused.  For every
//! other engine `pause` ends playback exactly like `stop`.
//!
//! The controller owns the engine handle and the state together behind one
//! mutex.  `play` initialises the engine while holding that lock, so two
//! racing calls can never create two engines.  Speech runs on a dedicated
//! thread; each `play` starts a new session number and a worker only applies
//! its completion if its session is still current, so a worker that outlives
//! a `stop` cannot touch a newer session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use super::{SpeechEngine, SpeechError, SpeechSynthesizer};

// ---------------------------------------------------------------------------
// PlaybackState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No engine is live.
    #[default]
    Idle,
    /// The engine is speaking on the worker thread.
    Playing,
    /// Speech is suspended and can be resumed with `play`.
    Paused,
    /// Speech ended with an engine error; the halted engine is kept until the
    /// next `play` or `stop`.
    Stopped,
}

impl PlaybackState {
    /// A short human-readable label suitable for the playback controls.
    pub fn label(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Playing => "Reading aloud",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The speech capability could not provide an engine.
    #[error("speech engine unavailable: {0}")]
    EngineInit(String),

    /// The playback worker thread could not be started or panicked.
    #[error("playback thread failed: {0}")]
    Thread(String),
}

/// Completion signal for one playback session.
///
/// Dropping it detaches the worker; the controller's state still tracks it.
#[derive(Debug)]
pub struct PlaybackSession {
    id: u64,
    handle: JoinHandle<()>,
}

impl PlaybackSession {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the worker has finished and applied its transition.
    pub fn join(self) -> Result<(), PlaybackError> {
        self.handle
            .join()
            .map_err(|_| PlaybackError::Thread("playback worker panicked".into()))
    }
}

/// What [`PlaybackController::play`] did.
#[derive(Debug)]
pub enum PlayOutcome {
    /// A fresh engine was created and speech started.
    Started(PlaybackSession),
    /// A paused engine was resumed.
    Resumed,
    /// Speech was already in progress; nothing changed.
    AlreadyPlaying,
    /// The text was blank; nothing changed.
    NothingToSay,
}

// ---------------------------------------------------------------------------
// PlaybackController
// ---------------------------------------------------------------------------

struct Inner {
    state: PlaybackState,
    engine: Option<Arc<dyn SpeechEngine>>,
    session: u64,
    last_error: Option<SpeechError>,
}

impl Inner {
    /// Stop and release the engine, invalidate the running session and go
    /// back to `Idle`.
    fn halt(&mut self) {
        self.session += 1;
        if let Some(engine) = self.engine.take() {
            engine.stop();
        }
        self.state = PlaybackState::Idle;
    }
}

/// Owns the single speech engine and its play/pause/stop state.
///
/// Cheap to clone; clones control the same engine.
#[derive(Clone)]
pub struct PlaybackController {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    inner: Arc<Mutex<Inner>>,
}

impl PlaybackController {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            inner: Arc::new(Mutex::new(Inner {
                state: PlaybackState::Idle,
                engine: None,
                session: 0,
                last_error: None,
            })),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state
    }

    /// The engine error that ended the last session, if any.
    pub fn last_error(&self) -> Option<SpeechError> {
        self.lock().last_error.clone()
    }

    /// Start reading `text` aloud, or resume a paused engine.
    ///
    /// Valid from `Idle` and `Stopped`; a no-op while `Playing`.  On engine
    /// initialisation failure the controller stays `Idle`.
    pub fn play(&self, text: &str) -> Result<PlayOutcome, PlaybackError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(PlayOutcome::NothingToSay);
        }

        let mut inner = self.lock();
        match inner.state {
            PlaybackState::Playing => return Ok(PlayOutcome::AlreadyPlaying),
            PlaybackState::Paused => {
                if let Some(engine) = inner.engine.clone() {
                    match engine.resume() {
                        Ok(()) => {
                            inner.state = PlaybackState::Playing;
                            log::debug!("playback: resumed session {}", inner.session);
                            return Ok(PlayOutcome::Resumed);
                        }
                        Err(e) => log::warn!("playback: resume failed ({e}), restarting"),
                    }
                }
            }
            PlaybackState::Idle | PlaybackState::Stopped => {}
        }

        // Release whatever is left of a previous session before creating the
        // replacement, so at most one engine is ever live.
        inner.halt();

        let engine = self.synthesizer.init_engine().map_err(|e| {
            log::error!("playback: engine initialisation failed: {e}");
            PlaybackError::EngineInit(e.to_string())
        })?;

        inner.session += 1;
        let session = inner.session;
        inner.engine = Some(Arc::clone(&engine));
        inner.state = PlaybackState::Playing;
        inner.last_error = None;

        let worker_inner = Arc::clone(&self.inner);
        let text = text.to_string();
        let char_count = text.chars().count();
        let spawned = thread::Builder::new()
            .name("speech-playback".into())
            .spawn(move || {
                let result = engine.speak_and_wait(&text);
                Self::complete(&worker_inner, session, result);
            });

        match spawned {
            Ok(handle) => {
                log::info!("playback: session {session} started ({char_count} chars)");
                Ok(PlayOutcome::Started(PlaybackSession {
                    id: session,
                    handle,
                }))
            }
            Err(e) => {
                inner.halt();
                Err(PlaybackError::Thread(e.to_string()))
            }
        }
    }

    /// Suspend playback if the engine can resume, otherwise end it.
    ///
    /// Returns the resulting state.
    pub fn pause(&self) -> PlaybackState {
        let mut inner = self.lock();
        if inner.state != PlaybackState::Playing {
            return inner.state;
        }

        let paused = match &inner.engine {
            Some(engine) if engine.supports_resume() => match engine.pause() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("playback: pause failed ({e}), stopping instead");
                    false
                }
            },
            _ => false,
        };

        if paused {
            inner.state = PlaybackState::Paused;
        } else {
            inner.halt();
        }
        log::debug!("playback: pause → {:?}", inner.state);
        inner.state
    }

    /// End playback and release the engine.  Always leaves the controller
    /// `Idle`.
    pub fn stop(&self) {
        let mut inner = self.lock();
        if inner.state != PlaybackState::Idle {
            log::info!("playback: session {} stopped", inner.session);
        }
        inner.halt();
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Worker-side transition once `speak_and_wait` returns.
    fn complete(inner: &Mutex<Inner>, session: u64, result: Result<(), SpeechError>) {
        let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.session != session {
            // Stopped or replaced while speaking; the new owner decides.
            return;
        }

        match result {
            Ok(()) => {
                inner.engine = None;
                inner.state = PlaybackState::Idle;
                log::info!("playback: session {session} finished");
            }
            Err(e) => {
                log::warn!("playback: session {session} failed: {e}");
                if let Some(engine) = &inner.engine {
                    engine.stop();
                }
                inner.state = PlaybackState::Stopped;
                inner.last_error = Some(e);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
