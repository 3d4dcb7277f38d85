//! Grammar checker window: egui/eframe application.
//!
//! # Architecture
//!
//! [`GrammarCheckerApp`] is the top-level [`eframe::App`].  It owns only UI
//! state (the input buffer, the selected options, the export path) and two
//! handles:
//!
//! * [`PipelineHandle`]: submits corrections to the background runner and
//!   exposes the [`SharedState`](crate::pipeline::SharedState) read every
//!   frame.
//! * [`PlaybackController`]: read-aloud of the output pane.
//!
//! # Layout
//!
//! ```text
//! ┌ Correct Grammar  Clear  Copy  Save │ Language ▾  Style ▾ │ ▶ ⏸ ⏹ Idle ┐
//! ├──────────────────────────────┬──────────────────────────────────────┤
//! │ input (editable)             │ corrected output, changes in red     │
//! ├──────────────────────────────┴──────────────────────────────────────┤
//! │ Processing...                         Word Count: 4 | Grade Level: … │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;
use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontId, RichText};

use crate::analysis::{segments, DiffSpan, ReadabilityReport};
use crate::config::AppConfig;
use crate::correction::{CorrectionConfig, Language, WritingStyle};
use crate::export::{self, ExportError};
use crate::pipeline::{lock_state, PipelineHandle, SubmitError, Submission};
use crate::speech::{PlayOutcome, PlaybackController, PlaybackState};

const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(220, 50, 47);
const ERROR_COLOR: Color32 = Color32::from_rgb(255, 136, 68);
const OK_COLOR: Color32 = Color32::from_rgb(80, 200, 120);
const TEXT_SIZE: f32 = 15.0;

// ---------------------------------------------------------------------------
// Snapshot: one consistent read of the shared state per frame
// ---------------------------------------------------------------------------

/// The window's copy of the shared state.
///
/// `busy` and `status` are re-read every frame.  The output, its spans and
/// the stats are only copied when the state's generation has moved.
#[derive(Debug, Clone, Default, PartialEq)]
struct Snapshot {
    generation: u64,
    busy: bool,
    status: Option<String>,
    output: String,
    spans: Vec<DiffSpan>,
    report: ReadabilityReport,
}

impl Snapshot {
    #[cfg(test)]
    fn capture(pipeline: &PipelineHandle) -> Self {
        let mut snap = Self::default();
        snap.refresh(pipeline);
        snap
    }

    /// Re-read the shared state; returns `true` when the output changed.
    fn refresh(&mut self, pipeline: &PipelineHandle) -> bool {
        let st = lock_state(pipeline.state());
        self.busy = st.is_busy();
        self.status = st.status().map(str::to_owned);
        if st.generation() == self.generation {
            return false;
        }

        self.generation = st.generation();
        (self.output, self.spans) = st
            .last_result()
            .map(|r| (r.display_text().to_string(), r.spans.clone()))
            .unwrap_or_default();
        self.report = st.readability();
        true
    }
}

/// Transient feedback from Copy / Save / playback.
#[derive(Debug, Clone, PartialEq)]
struct Notice {
    text: String,
    is_error: bool,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

// ---------------------------------------------------------------------------
// GrammarCheckerApp
// ---------------------------------------------------------------------------

pub struct GrammarCheckerApp {
    input: String,
    options: CorrectionConfig,
    export_path: String,
    notice: Option<Notice>,

    view: Snapshot,
    /// Highlighted output for the current `view`, with the text colour it
    /// was built for.
    output_job: Option<(Color32, LayoutJob)>,

    pipeline: PipelineHandle,
    playback: PlaybackController,
}

impl GrammarCheckerApp {
    pub fn new(config: &AppConfig, pipeline: PipelineHandle, playback: PlaybackController) -> Self {
        Self {
            input: String::new(),
            options: config.correction.clone(),
            export_path: config.ui.resolved_export_path().display().to_string(),
            notice: None,
            view: Snapshot::default(),
            output_job: None,
            pipeline,
            playback,
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn correct(&mut self) {
        match self.pipeline.submit(&self.input, self.options.clone()) {
            Ok(Submission::Queued) => {
                log::debug!("app: submitted {} chars", self.input.chars().count());
                self.notice = None;
            }
            Ok(Submission::Blank) => {}
            Err(SubmitError::Busy) => {}
            Err(e @ SubmitError::Unavailable) => {
                log::warn!("app: {e}");
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
    }

    /// Empty the input and output panes and reset the statistics.
    fn clear(&mut self) {
        self.input.clear();
        lock_state(self.pipeline.state()).clear_output();
        self.notice = None;
    }

    fn copy(&mut self, output: &str) {
        self.notice = Some(match export::copy_to_clipboard(output) {
            Ok(()) => Notice::info("Copied to clipboard"),
            Err(e) => export_notice(e),
        });
    }

    fn save(&mut self, output: &str) {
        let path = PathBuf::from(self.export_path.trim());
        if path.as_os_str().is_empty() {
            self.notice = Some(Notice::error("Choose a file path first"));
            return;
        }
        self.notice = Some(match export::save_output(&path, output) {
            Ok(()) => Notice::info(format!("Saved to {}", path.display())),
            Err(e) => export_notice(e),
        });
    }

    fn play(&mut self, output: &str) {
        match self.playback.play(output) {
            Ok(PlayOutcome::Started(_session)) => self.notice = None,
            Ok(PlayOutcome::Resumed | PlayOutcome::AlreadyPlaying) => {}
            Ok(PlayOutcome::NothingToSay) => {
                self.notice = Some(Notice::error("There is no text to read"));
            }
            Err(e) => self.notice = Some(Notice::error(e.to_string())),
        }
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_controls(&mut self, ui: &mut egui::Ui, snap: &Snapshot) {
        ui.horizontal_wrapped(|ui| {
            if ui
                .add_enabled(!snap.busy, egui::Button::new("Correct Grammar"))
                .clicked()
            {
                self.correct();
            }
            if ui.button("Clear").clicked() {
                self.clear();
            }
            if ui.button("Copy").clicked() {
                self.copy(&snap.output);
            }
            if ui.button("Save").clicked() {
                self.save(&snap.output);
            }

            ui.separator();

            egui::ComboBox::from_label("Language")
                .selected_text(self.options.language.as_str().to_string())
                .show_ui(ui, |ui| {
                    for language in Language::KNOWN.iter() {
                        ui.selectable_value(
                            &mut self.options.language,
                            language.clone(),
                            language.as_str(),
                        );
                    }
                });
            egui::ComboBox::from_label("Style")
                .selected_text(self.options.style.as_str().to_string())
                .show_ui(ui, |ui| {
                    for style in WritingStyle::KNOWN.iter() {
                        ui.selectable_value(&mut self.options.style, style.clone(), style.as_str());
                    }
                });

            ui.separator();

            let playback = self.playback.state();
            if ui.button("▶").on_hover_text("Read aloud").clicked() {
                self.play(&snap.output);
            }
            if ui
                .add_enabled(playback == PlaybackState::Playing, egui::Button::new("⏸"))
                .on_hover_text("Pause")
                .clicked()
            {
                self.playback.pause();
            }
            if ui
                .add_enabled(playback != PlaybackState::Idle, egui::Button::new("⏹"))
                .on_hover_text("Stop")
                .clicked()
            {
                self.playback.stop();
            }
            ui.label(RichText::new(playback.label()).color(playback_color(playback)));
        });

        ui.horizontal(|ui| {
            ui.label("Save to:");
            ui.add(egui::TextEdit::singleline(&mut self.export_path).desired_width(360.0));
        });
    }

    fn draw_status(&self, ui: &mut egui::Ui, snap: &Snapshot) {
        ui.horizontal(|ui| {
            if let Some(status) = &snap.status {
                ui.spinner();
                ui.label(status);
            } else if let Some(notice) = &self.notice {
                let color = if notice.is_error { ERROR_COLOR } else { OK_COLOR };
                ui.label(RichText::new(&notice.text).color(color));
            } else if let Some(err) = self.playback.last_error() {
                ui.label(RichText::new(err.to_string()).color(ERROR_COLOR));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(snap.report.to_string());
            });
        });
    }

    fn draw_panes(&mut self, ui: &mut egui::Ui, snap: &Snapshot) {
        let text_color = ui.visuals().text_color();
        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Input").strong());
            egui::ScrollArea::vertical()
                .id_salt("input")
                .show(&mut cols[0], |ui| {
                    ui.add_sized(
                        ui.available_size(),
                        egui::TextEdit::multiline(&mut self.input)
                            .hint_text("Type or paste text to correct")
                            .font(FontId::proportional(TEXT_SIZE)),
                    );
                });

            cols[1].label(RichText::new("Corrected").strong());
            egui::ScrollArea::vertical()
                .id_salt("output")
                .show(&mut cols[1], |ui| {
                    let frame = egui::Frame::new()
                        .fill(ui.visuals().extreme_bg_color)
                        .corner_radius(egui::CornerRadius::same(4))
                        .inner_margin(egui::Margin::same(6));
                    frame.show(ui, |ui| {
                        ui.set_min_size(ui.available_size());
                        let mut job = cached_job(&mut self.output_job, snap, text_color);
                        job.wrap.max_width = ui.available_width();
                        ui.label(job);
                    });
                });
        });
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for GrammarCheckerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.view.refresh(&self.pipeline) {
            self.output_job = None;
        }
        let snap = std::mem::take(&mut self.view);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.draw_controls(ui, &snap);
            ui.add_space(4.0);
        });
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.draw_status(ui, &snap);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_panes(ui, &snap);
        });

        // The runner and the playback worker update state off-thread.
        if snap.busy || self.playback.state() == PlaybackState::Playing {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        self.view = snap;
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.playback.stop();
        log::info!("grammar checker window closing");
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the output pane's text with changed regions in red.
fn highlighted_job(text: &str, spans: &[DiffSpan], base: Color32) -> LayoutJob {
    let mut job = LayoutJob::default();
    for segment in segments(text, spans) {
        let color = if segment.highlighted {
            HIGHLIGHT_COLOR
        } else {
            base
        };
        job.append(
            segment.text,
            0.0,
            TextFormat {
                font_id: FontId::proportional(TEXT_SIZE),
                color,
                ..Default::default()
            },
        );
    }
    job
}

/// The highlighted output for `snap`, rebuilt only when the cache is empty
/// or was built for another text colour.
fn cached_job(cache: &mut Option<(Color32, LayoutJob)>, snap: &Snapshot, base: Color32) -> LayoutJob {
    match cache {
        Some((color, job)) if *color == base => job.clone(),
        _ => {
            let job = highlighted_job(&snap.output, &snap.spans, base);
            *cache = Some((base, job.clone()));
            job
        }
    }
}

fn export_notice(err: ExportError) -> Notice {
    log::warn!("app: export failed: {err}");
    Notice::error(err.to_string())
}

fn playback_color(state: PlaybackState) -> Color32 {
    match state {
        PlaybackState::Idle => Color32::from_rgb(140, 140, 140),
        PlaybackState::Playing => OK_COLOR,
        PlaybackState::Paused => Color32::from_rgb(68, 136, 255),
        PlaybackState::Stopped => ERROR_COLOR,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::tempdir;
    use tokio::sync::mpsc;

    use crate::correction::CorrectionOutcome;
    use crate::pipeline::{new_shared_state, CorrectionCommand, CorrectionResult, PipelineRun};
    use crate::speech::CommandSynthesizer;

    fn app() -> (GrammarCheckerApp, mpsc::Receiver<CorrectionCommand>) {
        let (tx, rx) = mpsc::channel(4);
        let pipeline = PipelineHandle::new(new_shared_state(), tx);
        let playback = PlaybackController::new(Arc::new(CommandSynthesizer::new(
            "definitely-not-a-tts-program-xyz",
            vec![],
        )));
        (GrammarCheckerApp::new(&AppConfig::default(), pipeline, playback), rx)
    }

    fn finish_with(app: &GrammarCheckerApp, text: &str) {
        let mut st = lock_state(app.pipeline.state());
        st.try_begin();
        st.finish(PipelineRun::Completed(CorrectionResult {
            source_text: "He go to school.".into(),
            outcome: CorrectionOutcome::Success {
                corrected_text: text.into(),
            },
            spans: vec![DiffSpan::new(3, 8)],
            readability: Some(ReadabilityReport::analyze(text)),
        }));
    }

    #[test]
    fn highlighted_job_colours_changed_regions() {
        let job = highlighted_job("He goes to school.", &[DiffSpan::new(3, 8)], Color32::WHITE);

        assert_eq!(job.text, "He goes to school.");
        assert_eq!(job.sections.len(), 3);
        assert_eq!(job.sections[0].format.color, Color32::WHITE);
        assert_eq!(job.sections[1].format.color, HIGHLIGHT_COLOR);
        assert_eq!(&job.text[job.sections[1].byte_range.clone()], "goes ");
    }

    #[test]
    fn highlighted_job_without_spans_is_one_section() {
        let job = highlighted_job("Fine.", &[], Color32::WHITE);
        assert_eq!(job.sections.len(), 1);
    }

    #[test]
    fn snapshot_reflects_shared_state() {
        let (app, _rx) = app();
        assert_eq!(Snapshot::capture(&app.pipeline), Snapshot::default());

        finish_with(&app, "He goes to school.");
        let snap = Snapshot::capture(&app.pipeline);
        assert!(!snap.busy);
        assert_eq!(snap.output, "He goes to school.");
        assert_eq!(snap.spans, vec![DiffSpan::new(3, 8)]);
        assert_eq!(snap.report.word_count, 4);
    }

    #[test]
    fn refresh_copies_output_only_when_the_generation_moves() {
        let (app, _rx) = app();
        let mut view = Snapshot::default();
        assert!(!view.refresh(&app.pipeline));

        finish_with(&app, "He goes to school.");
        assert!(view.refresh(&app.pipeline));
        assert_eq!(view.output, "He goes to school.");
        assert!(!view.refresh(&app.pipeline));

        // Starting a request changes the status but not the output.
        assert!(lock_state(app.pipeline.state()).try_begin());
        assert!(!view.refresh(&app.pipeline));
        assert!(view.busy);
        assert_eq!(view.output, "He goes to school.");

        lock_state(app.pipeline.state()).clear_output();
        assert!(view.refresh(&app.pipeline));
        assert!(view.output.is_empty());
        assert_eq!(view.report, ReadabilityReport::default());
    }

    #[test]
    fn cached_job_is_reused_until_invalidated() {
        let (app, _rx) = app();
        finish_with(&app, "He goes to school.");
        let snap = Snapshot::capture(&app.pipeline);
        let mut cache = None;

        let first = cached_job(&mut cache, &snap, Color32::WHITE);
        assert_eq!(first.text, "He goes to school.");

        // A stale cache for the same colour is returned as is.
        let other = Snapshot::default();
        assert_eq!(cached_job(&mut cache, &other, Color32::WHITE).text, "He goes to school.");

        // A different text colour rebuilds.
        assert_eq!(cached_job(&mut cache, &other, Color32::BLACK).text, "");
    }

    #[test]
    fn correct_queues_a_command() {
        let (mut app, mut rx) = app();
        app.input = "He go to school.".into();
        app.options = CorrectionConfig::new(Language::French, WritingStyle::Formal);
        app.correct();

        let snap = Snapshot::capture(&app.pipeline);
        assert!(snap.busy);
        assert_eq!(snap.status.as_deref(), Some("Processing..."));
        let CorrectionCommand::Correct { text, config } = rx.try_recv().unwrap();
        assert_eq!(text, "He go to school.");
        assert_eq!(config.language, Language::French);
    }

    #[test]
    fn correct_with_blank_input_does_nothing() {
        let (mut app, mut rx) = app();
        app.input = "   ".into();
        app.correct();

        assert!(!Snapshot::capture(&app.pipeline).busy);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn clear_resets_input_output_and_stats() {
        let (mut app, _rx) = app();
        app.input = "He go to school.".into();
        finish_with(&app, "He goes to school.");

        app.clear();

        let snap = Snapshot::capture(&app.pipeline);
        assert!(app.input.is_empty());
        assert!(snap.output.is_empty());
        assert_eq!(snap.report.to_string(), "Word Count: 0 | Grade Level: 0");
    }

    #[test]
    fn save_writes_output_to_the_edited_path() {
        let (mut app, _rx) = app();
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        app.export_path = path.display().to_string();

        app.save("He goes to school.");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "He goes to school.");
        assert!(!app.notice.as_ref().unwrap().is_error);
    }

    #[test]
    fn save_to_a_docx_path_writes_a_document() {
        let (mut app, _rx) = app();
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.docx");
        app.export_path = path.display().to_string();

        app.save("He goes to school.");

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
        assert!(docx_rs::read_docx(&bytes).is_ok());
        assert!(!app.notice.as_ref().unwrap().is_error);
    }

    #[test]
    fn save_without_output_reports_an_error() {
        let (mut app, _rx) = app();
        let dir = tempdir().unwrap();
        app.export_path = dir.path().join("out.txt").display().to_string();

        app.save("");
        assert!(app.notice.as_ref().unwrap().is_error);
    }

    #[test]
    fn play_without_engine_reports_an_error_and_stays_idle() {
        let (mut app, _rx) = app();
        app.play("He goes to school.");

        assert_eq!(app.playback.state(), PlaybackState::Idle);
        let notice = app.notice.clone().unwrap();
        assert!(notice.is_error);
        assert!(notice.text.contains("speech engine unavailable"));
    }

    #[test]
    fn options_start_from_config() {
        let (app, _rx) = app();
        assert_eq!(app.options, CorrectionConfig::default());
        assert!(app.export_path.ends_with("corrected.txt"));
    }
}
