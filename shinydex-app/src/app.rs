use std::sync::Arc;

use eframe::egui;
use tracing::{error, info};

use shinydex_core::{AssetRoots, Catalog, FileStore, Tracker};
use shinydex_render::{
    Capture, LayoutMetrics, OptionsBar, StatsBar, Surface, SvgCapture, TriggerControl,
};

use crate::interaction::Checklist;
use crate::preferences::AppPreferences;
use crate::textures::TextureCache;
use crate::ui::export::ExportState;

pub(crate) const TRIGGER_LABEL: &str = "Save as image";
pub(crate) const BUSY_LABEL: &str = "Generating\u{2026}";

/// What the central panel shows.
pub(crate) enum Content {
    Ready(Checklist<FileStore>),
    /// The catalog could not be loaded; only this notice is shown.
    Failed(String),
}

pub(crate) struct ShinyDexApp {
    pub(crate) preferences: AppPreferences,
    pub(crate) content: Content,
    pub(crate) surface: Surface,
    pub(crate) metrics: LayoutMetrics,
    pub(crate) textures: TextureCache,
    /// Scroll position to force on the grid next frame.
    pub(crate) scroll_override: Option<f32>,
    pub(crate) show_help: bool,
    pub(crate) export: ExportState,
}

impl ShinyDexApp {
    pub(crate) fn new(preferences: AppPreferences) -> Self {
        let content = match Catalog::load(&preferences.catalog_file()) {
            Ok(catalog) => {
                let store = FileStore::open(preferences.storage_file());
                let assets = AssetRoots::new(
                    &preferences.asset_root(),
                    &preferences.obtained_folder,
                    &preferences.normal_folder,
                );
                Content::Ready(Checklist::new(Tracker::load(catalog, store), &assets))
            }
            Err(e) => {
                error!("Catalog unavailable: {e}");
                Content::Failed(format!("Could not load the catalog: {e}"))
            }
        };

        let mut surface = Surface::new(preferences.window_width, preferences.window_height);
        if preferences.show_stats_bar {
            surface.stats_bar = Some(StatsBar::default());
        }
        if preferences.show_options_bar {
            surface.options_bar = Some(OptionsBar::default());
            surface.trigger = Some(TriggerControl::new(TRIGGER_LABEL));
        }
        if let Content::Ready(dex) = &content {
            surface.sync_images(dex.view());
        }

        let backend: Arc<dyn Capture> = Arc::new(SvgCapture::new());
        Self {
            metrics: LayoutMetrics::with_tile_size(preferences.tile_size),
            preferences,
            content,
            surface,
            textures: TextureCache::default(),
            scroll_override: None,
            show_help: false,
            export: ExportState::new(Some(backend)),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            self.start_export(ctx);
        }
    }

    fn draw_error_notice(&self, ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new(message)
                        .size(18.0)
                        .color(egui::Color32::from_rgb(255, 110, 110)),
                );
            });
        });
    }
}

impl eframe::App for ShinyDexApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        if let Content::Failed(message) = &self.content {
            let message = message.clone();
            self.draw_error_notice(ctx, &message);
            return;
        }

        self.handle_shortcuts(ctx);
        self.draw_grid(ctx);
        self.poll_export(ctx);
        self.draw_export_notification(ctx);
        self.show_help_window(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.preferences.save();
        if let Content::Ready(dex) = &mut self.content {
            dex.commit_editor();
            dex.tracker_mut().save();
            info!("Progress saved to {}", dex.tracker().store().path().display());
        }
        info!(
            "Saved preferences and progress on exit ({} textures cached)",
            self.textures.len()
        );
    }
}
