//! Snapshot export: surface preparation, settle delay, background capture,
//! restoration, and the result notification.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{debug, error, info};

use shinydex_render::{
    export_png, snapshot_file_name, unique_path, Capture, CaptureRequest, ExportMetadata,
    ExportSession, RenderError, SnapshotDocument,
};

use crate::app::{Content, ShinyDexApp, BUSY_LABEL};
use crate::app_dir;

pub(crate) enum ExportWorkerResult {
    Success(PathBuf),
    Error(String),
}

enum ExportPhase {
    Idle,
    /// Surface prepared; waiting for eager images and layout to settle.
    Settling {
        session: ExportSession,
        deadline: Instant,
    },
    Capturing {
        session: ExportSession,
        rx: mpsc::Receiver<ExportWorkerResult>,
    },
}

pub(crate) struct ExportState {
    phase: ExportPhase,
    backend: Option<Arc<dyn Capture>>,
    toast: Option<Toast>,
}

impl ExportState {
    pub(crate) fn new(backend: Option<Arc<dyn Capture>>) -> Self {
        Self {
            phase: ExportPhase::Idle,
            backend,
            toast: None,
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        !matches!(self.phase, ExportPhase::Idle)
    }

    fn notify(&mut self, message: String, is_error: bool) {
        self.toast = Some(Toast {
            message,
            shown_at: Instant::now(),
            is_error,
        });
    }
}

const TOAST_LIFETIME: Duration = Duration::from_secs(5);
const TOAST_FADE_SECS: f32 = 1.0;
const TOAST_GAP: f32 = 16.0;

/// Export result message. Fully opaque until its last second, then fades.
struct Toast {
    message: String,
    shown_at: Instant,
    is_error: bool,
}

impl Toast {
    /// Opacity after `elapsed`, or `None` once the toast has expired.
    fn opacity(&self, elapsed: Duration) -> Option<f32> {
        if elapsed > TOAST_LIFETIME {
            return None;
        }
        let remaining = (TOAST_LIFETIME - elapsed).as_secs_f32();
        Some((remaining / TOAST_FADE_SECS).clamp(0.0, 1.0))
    }
}

/// Distance from the window bottom so the toast sits above the stats bar.
fn toast_lift(stats_bar_height: Option<f32>) -> f32 {
    stats_bar_height.unwrap_or(0.0) + TOAST_GAP
}

/// Everything the worker thread needs; owned so it can outlive the frame.
struct ExportJob {
    backend: Arc<dyn Capture>,
    request: CaptureRequest,
    metadata: ExportMetadata,
    path: PathBuf,
}

fn export_worker(job: &ExportJob) -> ExportWorkerResult {
    let result = job
        .backend
        .capture(&job.request)
        .and_then(|buffer| export_png(&buffer, &job.path, &job.metadata));
    match result {
        Ok(()) => ExportWorkerResult::Success(job.path.clone()),
        Err(e) => ExportWorkerResult::Error(e.to_string()),
    }
}

fn output_path(dir: &Path, prefix: &str, date: chrono::NaiveDate) -> PathBuf {
    let file_name = snapshot_file_name(prefix, date);
    let stem = file_name.trim_end_matches(".png");
    unique_path(dir, stem, "png")
}

impl ShinyDexApp {
    /// Prepare the surface and arm the settle timer. No-op while an export
    /// is already running.
    pub(crate) fn start_export(&mut self, ctx: &egui::Context) {
        if self.export.is_busy() {
            return;
        }
        let Content::Ready(dex) = &mut self.content else {
            return;
        };
        dex.commit_editor();

        let session = ExportSession::begin(&mut self.surface, dex.view(), &self.metrics, BUSY_LABEL);
        self.scroll_override = Some(self.surface.scroll_offset);
        if self.export.backend.is_none() {
            self.fail_export(session, RenderError::CaptureUnavailable.to_string());
            return;
        }

        let delay = Duration::from_millis(self.preferences.export_delay_ms);
        info!("Export started, capturing in {} ms", delay.as_millis());
        self.export.phase = ExportPhase::Settling {
            session,
            deadline: Instant::now() + delay,
        };
        ctx.request_repaint_after(delay);
    }

    /// Advance the export state machine. Called once per frame after the grid
    /// has been drawn in its prepared state.
    pub(crate) fn poll_export(&mut self, ctx: &egui::Context) {
        match std::mem::replace(&mut self.export.phase, ExportPhase::Idle) {
            ExportPhase::Idle => {}
            ExportPhase::Settling { session, deadline } => {
                let now = Instant::now();
                if now < deadline {
                    self.export.phase = ExportPhase::Settling { session, deadline };
                    ctx.request_repaint_after(deadline - now);
                    return;
                }
                self.begin_capture(ctx, session);
            }
            ExportPhase::Capturing { session, rx } => match rx.try_recv() {
                Ok(result) => {
                    self.finish_export(session);
                    match result {
                        ExportWorkerResult::Success(path) => {
                            info!("Export complete: {}", path.display());
                            let short = path
                                .file_name()
                                .map(|f| f.to_string_lossy().into_owned())
                                .unwrap_or_else(|| path.display().to_string());
                            self.export.notify(format!("Exported: {short}"), false);
                        }
                        ExportWorkerResult::Error(msg) => {
                            error!("Export failed: {msg}");
                            self.export.notify(format!("Export failed: {msg}"), true);
                        }
                    }
                }
                Err(mpsc::TryRecvError::Empty) => {
                    self.export.phase = ExportPhase::Capturing { session, rx };
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.fail_export(session, "export worker stopped".to_string());
                }
            },
        }
    }

    fn begin_capture(&mut self, ctx: &egui::Context, session: ExportSession) {
        let Some(backend) = self.export.backend.clone() else {
            self.fail_export(session, RenderError::CaptureUnavailable.to_string());
            return;
        };
        let Content::Ready(dex) = &self.content else {
            self.finish_export(session);
            return;
        };

        let document =
            SnapshotDocument::from_surface(dex.view(), dex.stats(), &self.surface, &self.metrics);
        let request = CaptureRequest {
            document,
            background: self.preferences.export_background,
        };
        let today = chrono::Utc::now().date_naive();
        let metadata = ExportMetadata::new(dex.stats(), today, request.width(), request.height());

        let out_dir = app_dir::images_directory();
        if let Err(e) = std::fs::create_dir_all(&out_dir) {
            self.fail_export(session, format!("cannot create {}: {e}", out_dir.display()));
            return;
        }
        let path = output_path(&out_dir, &self.preferences.export_prefix, today);

        let job = ExportJob {
            backend,
            request,
            metadata,
            path,
        };
        let (tx, rx) = mpsc::channel();
        let repaint = ctx.clone();
        debug!("Spawning export worker for {}", job.path.display());
        match std::thread::Builder::new()
            .name("export-worker".into())
            .spawn(move || {
                let result = export_worker(&job);
                let _ = tx.send(result);
                repaint.request_repaint();
            }) {
            Ok(_) => self.export.phase = ExportPhase::Capturing { session, rx },
            Err(e) => self.fail_export(session, format!("cannot spawn export thread: {e}")),
        }
    }

    /// Single restoration point for every terminal path.
    fn finish_export(&mut self, session: ExportSession) {
        session.restore(&mut self.surface);
        self.scroll_override = Some(self.surface.scroll_offset);
    }

    fn fail_export(&mut self, session: ExportSession, msg: String) {
        self.finish_export(session);
        error!("Export failed: {msg}");
        self.export.notify(format!("Export failed: {msg}"), true);
    }

    pub(crate) fn draw_export_notification(&mut self, ctx: &egui::Context) {
        let Some(toast) = &self.export.toast else {
            return;
        };
        let Some(alpha) = toast.opacity(toast.shown_at.elapsed()) else {
            self.export.toast = None;
            return;
        };
        let text = if toast.is_error {
            egui::Color32::from_rgb(255, 100, 100)
        } else {
            egui::Color32::from_rgb(100, 255, 140)
        };
        let bar = self
            .surface
            .stats_bar
            .as_ref()
            .map(|_| self.metrics.stats_bar_height);

        egui::Area::new(egui::Id::new("export_toast"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -toast_lift(bar)])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(egui::Color32::from_black_alpha((alpha * 200.0) as u8))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(toast.message.as_str())
                                .color(text.gamma_multiply(alpha)),
                        );
                    });
            });
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast() -> Toast {
        Toast {
            message: "Exported: dex.png".into(),
            shown_at: Instant::now(),
            is_error: false,
        }
    }

    #[test]
    fn toast_fades_in_last_second() {
        let toast = toast();
        assert_eq!(toast.opacity(Duration::ZERO), Some(1.0));
        assert_eq!(toast.opacity(Duration::from_secs(4)), Some(1.0));
        let fading = toast.opacity(Duration::from_millis(4500)).unwrap();
        assert!((fading - 0.5).abs() < 1e-3);
        assert_eq!(toast.opacity(Duration::from_millis(5001)), None);
    }

    #[test]
    fn toast_clears_stats_bar() {
        assert_eq!(toast_lift(None), TOAST_GAP);
        assert_eq!(toast_lift(Some(56.0)), 56.0 + TOAST_GAP);
        assert_eq!(toast_lift(Some(90.0)), 90.0 + TOAST_GAP);
    }

    #[test]
    fn output_path_is_dated_and_unique() {
        let dir = std::env::temp_dir().join("shinydex_test_output_path");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create dir");
        let date = chrono::NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();

        let first = output_path(&dir, "pokemon_shiny_dex", date);
        assert_eq!(first, dir.join("pokemon_shiny_dex_2025-07-01.png"));
        std::fs::write(&first, b"png").expect("write");
        assert_eq!(
            output_path(&dir, "pokemon_shiny_dex", date),
            dir.join("pokemon_shiny_dex_2025-07-01_001.png")
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn worker_reports_capture_failure() {
        struct Unavailable;
        impl Capture for Unavailable {
            fn capture(&self, _: &CaptureRequest) -> Result<shinydex_render::RenderBuffer, RenderError> {
                Err(RenderError::CaptureUnavailable)
            }
        }
        let document = SnapshotDocument {
            width: 10.0,
            height: 10.0,
            metrics: shinydex_render::LayoutMetrics::default(),
            options_bar: None,
            cards: Vec::new(),
            stats_bar: None,
        };
        let job = ExportJob {
            backend: Arc::new(Unavailable),
            request: CaptureRequest::new(document),
            metadata: ExportMetadata::new(
                &shinydex_core::Stats::default(),
                chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                10,
                10,
            ),
            path: std::env::temp_dir().join("shinydex_never_written.png"),
        };
        match export_worker(&job) {
            ExportWorkerResult::Error(msg) => assert!(msg.contains("not available")),
            ExportWorkerResult::Success(_) => panic!("capture failure must surface"),
        }
        assert!(!job.path.exists());
    }
}
