//! Application entry point: Grammar Checker.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime.
//! 4. Build the correction backend ([`ApiBackend`]) and service from config.
//! 5. Spawn the [`PipelineRunner`] on the runtime.
//! 6. Build the [`PlaybackController`] over the configured speech program.
//! 7. Run [`eframe::run_native`], which blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use eframe::egui;
use tokio::sync::mpsc;

use grammar_checker::{
    app::GrammarCheckerApp,
    config::AppConfig,
    correction::{ApiBackend, CorrectionService},
    pipeline::{new_shared_state, CorrectionCommand, CorrectionPipeline, PipelineHandle, PipelineRunner},
    speech::{CommandSynthesizer, PlaybackController},
};

/// Pending corrections; the UI never has more than one in flight.
const COMMAND_QUEUE: usize = 8;

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_title("Grammar Checker")
        .with_inner_size([width, height])
        .with_min_inner_size([640.0, 360.0]);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Grammar Checker starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    log::info!("backend: {:?} at {}", config.backend.provider, config.backend.base_url);

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    // 4. Correction service
    let backend = Arc::new(ApiBackend::from_config(&config.backend));
    let service = CorrectionService::new(backend, config.backend.model.clone());
    log::info!("correcting with model {}", service.model());

    // 5. Runner
    let state = new_shared_state();
    let (command_tx, command_rx) = mpsc::channel::<CorrectionCommand>(COMMAND_QUEUE);
    let runner = PipelineRunner::new(Arc::clone(&state), CorrectionPipeline::new(service));
    rt.spawn(runner.run(command_rx));

    // 6. Playback
    let synthesizer = CommandSynthesizer::from_config(&config.speech);
    log::info!("speech program: {}", synthesizer.program());
    let playback = PlaybackController::new(Arc::new(synthesizer));

    // 7. Window (blocks until closed)
    let app = GrammarCheckerApp::new(&config, PipelineHandle::new(state, command_tx), playback);
    eframe::run_native(
        "Grammar Checker",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    log::info!("Grammar Checker shut down");
    Ok(())
}
