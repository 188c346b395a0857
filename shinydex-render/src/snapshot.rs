//! The live display surface, the scoped mutations an export applies to it,
//! and the frozen document handed to the capture backend.

use std::collections::BTreeMap;
use std::path::PathBuf;

use shinydex_core::Stats;
use tracing::{debug, warn};

use crate::layout::{DocumentLayout, LayoutMetrics, Rect};
use crate::view::ViewModel;

// ---------------------------------------------------------------------------
// Surface state
// ---------------------------------------------------------------------------

/// How a tile image is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loading {
    /// Loaded once the tile scrolls into view.
    Lazy,
    /// Loaded immediately, visible or not.
    Eager,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Stuck to the bottom edge of the viewport.
    Sticky,
    /// At a fixed document offset.
    Absolute { top: f32 },
}

/// Inline style overriding the stats bar's default look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarStyle {
    pub placement: Placement,
    pub backdrop_blur: bool,
    pub z_index: i32,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            placement: Placement::Sticky,
            backdrop_blur: true,
            z_index: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsBar {
    /// `None` means no inline style: the default sticky, blurred bar.
    pub style: Option<BarStyle>,
}

impl StatsBar {
    pub fn effective_style(&self) -> BarStyle {
        self.style.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Shown,
    Hidden,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsBar {
    pub display: Display,
}

/// The button that starts an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerControl {
    pub label: String,
    pub enabled: bool,
}

impl TriggerControl {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
        }
    }
}

/// Mutable presentation state of the window showing the grid.
///
/// Optional parts model page elements that may be absent; every operation
/// skips a missing part.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub scroll_offset: f32,
    pub stats_bar: Option<StatsBar>,
    pub options_bar: Option<OptionsBar>,
    pub trigger: Option<TriggerControl>,
    /// Loading mode per tile position `(region, index)`.
    pub images: BTreeMap<(usize, usize), Loading>,
}

impl Surface {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport_width,
            viewport_height,
            scroll_offset: 0.0,
            stats_bar: None,
            options_bar: None,
            trigger: None,
            images: BTreeMap::new(),
        }
    }

    /// Register every tile of `view` as lazily loaded.
    pub fn sync_images(&mut self, view: &ViewModel) {
        self.images.clear();
        for (r, region) in view.regions.iter().enumerate() {
            for i in 0..region.tiles.len() {
                self.images.insert((r, i), Loading::Lazy);
            }
        }
    }

    pub fn options_bar_shown(&self) -> bool {
        self.options_bar
            .as_ref()
            .is_some_and(|bar| bar.display == Display::Shown)
    }

    /// Whether the image at `position`, laid out at `rect`, has been fetched:
    /// eager images always are, lazy ones once they intersect the viewport.
    pub fn image_loaded(&self, position: (usize, usize), rect: &Rect) -> bool {
        match self.images.get(&position) {
            Some(Loading::Lazy) => rect.intersects_band(self.scroll_offset, self.viewport_height),
            Some(Loading::Eager) | None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Export session
// ---------------------------------------------------------------------------

/// Inverse of one mutation applied by [`ExportSession::begin`].
#[derive(Debug)]
enum Undo {
    Trigger(TriggerControl),
    Scroll(f32),
    ImageLoading {
        position: (usize, usize),
        loading: Loading,
    },
    OptionsBarDisplay(Display),
    StatsBarStyle(Option<BarStyle>),
}

/// The surface adjustments made for a faithful capture.
///
/// Each mutation records its inverse as it is applied. [`restore`] consumes
/// the session, so restoration runs exactly once on whichever path ends the
/// export.
///
/// [`restore`]: ExportSession::restore
#[derive(Debug)]
pub struct ExportSession {
    undo: Vec<Undo>,
    layout: DocumentLayout,
}

impl ExportSession {
    /// Prepare `surface` for capture:
    /// - disable the trigger and show `busy_label`
    /// - scroll to the origin
    /// - switch lazy images to eager
    /// - hide the options bar
    /// - pin the stats bar to the bottom of the full document, without blur
    pub fn begin(
        surface: &mut Surface,
        view: &ViewModel,
        metrics: &LayoutMetrics,
        busy_label: &str,
    ) -> Self {
        let mut undo = Vec::new();

        if let Some(trigger) = surface.trigger.as_mut() {
            undo.push(Undo::Trigger(trigger.clone()));
            trigger.label = busy_label.to_string();
            trigger.enabled = false;
        }

        undo.push(Undo::Scroll(surface.scroll_offset));
        surface.scroll_offset = 0.0;

        for (&position, loading) in surface.images.iter_mut() {
            if *loading == Loading::Lazy {
                undo.push(Undo::ImageLoading {
                    position,
                    loading: *loading,
                });
                *loading = Loading::Eager;
            }
        }

        if let Some(bar) = surface.options_bar.as_mut() {
            undo.push(Undo::OptionsBarDisplay(bar.display));
            bar.display = Display::Hidden;
        }

        let layout = DocumentLayout::compute(
            view,
            surface.viewport_width,
            metrics,
            surface.options_bar_shown(),
        );

        if let Some(bar) = surface.stats_bar.as_mut() {
            undo.push(Undo::StatsBarStyle(bar.style));
            bar.style = Some(BarStyle {
                placement: Placement::Absolute {
                    top: layout.stats_bar_top(metrics),
                },
                backdrop_blur: false,
                z_index: 9999,
            });
        }

        debug!(
            "Export session started: {} mutations, document {}x{}",
            undo.len(),
            layout.width,
            layout.height
        );
        Self { undo, layout }
    }

    /// Layout of the document as it will be captured.
    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    /// Undo every mutation, most recent first.
    pub fn restore(mut self, surface: &mut Surface) {
        let count = self.undo.len();
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::Trigger(original) => {
                    if let Some(trigger) = surface.trigger.as_mut() {
                        *trigger = original;
                    }
                }
                Undo::Scroll(offset) => surface.scroll_offset = offset,
                Undo::ImageLoading { position, loading } => {
                    if let Some(slot) = surface.images.get_mut(&position) {
                        *slot = loading;
                    }
                }
                Undo::OptionsBarDisplay(display) => {
                    if let Some(bar) = surface.options_bar.as_mut() {
                        bar.display = display;
                    }
                }
                Undo::StatsBarStyle(style) => {
                    if let Some(bar) = surface.stats_bar.as_mut() {
                        bar.style = style;
                    }
                }
            }
        }
        debug!("Export session restored {count} mutations");
    }
}

impl Drop for ExportSession {
    fn drop(&mut self) {
        if !self.undo.is_empty() {
            warn!(
                "Export session dropped with {} mutations not restored",
                self.undo.len()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotTile {
    pub rect: Rect,
    /// `None` when the image has not been fetched on the surface.
    pub image: Option<PathBuf>,
    pub badge: Option<u32>,
    pub obtained: bool,
    pub desaturated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotCard {
    pub rect: Rect,
    pub header: Rect,
    pub title: String,
    pub progress: String,
    pub tiles: Vec<SnapshotTile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotStatsBar {
    pub rect: Rect,
    pub blur: bool,
    pub entries: Vec<String>,
}

/// A frozen, self-contained copy of what the surface shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotDocument {
    pub width: f32,
    pub height: f32,
    pub metrics: LayoutMetrics,
    pub options_bar: Option<Rect>,
    pub cards: Vec<SnapshotCard>,
    pub stats_bar: Option<SnapshotStatsBar>,
}

impl SnapshotDocument {
    /// Freeze the current state of `surface` showing `view`.
    pub fn from_surface(
        view: &ViewModel,
        stats: &Stats,
        surface: &Surface,
        metrics: &LayoutMetrics,
    ) -> Self {
        let layout = DocumentLayout::compute(
            view,
            surface.viewport_width,
            metrics,
            surface.options_bar_shown(),
        );

        let cards = view
            .regions
            .iter()
            .zip(&layout.cards)
            .enumerate()
            .map(|(r, (region, card))| SnapshotCard {
                rect: card.rect,
                header: card.header,
                title: region.name.clone(),
                progress: region.progress.label(),
                tiles: region
                    .tiles
                    .iter()
                    .zip(&card.tiles)
                    .enumerate()
                    .map(|(i, (tile, rect))| SnapshotTile {
                        rect: *rect,
                        image: surface
                            .image_loaded((r, i), rect)
                            .then(|| tile.image.clone()),
                        badge: tile.badge,
                        obtained: tile.obtained(),
                        desaturated: tile.desaturated,
                    })
                    .collect(),
            })
            .collect();

        let stats_bar = surface.stats_bar.as_ref().map(|bar| {
            let style = bar.effective_style();
            let top = match style.placement {
                Placement::Sticky => {
                    surface.scroll_offset + surface.viewport_height - metrics.stats_bar_height
                }
                Placement::Absolute { top } => top,
            };
            SnapshotStatsBar {
                rect: Rect::new(0.0, top, layout.width, metrics.stats_bar_height),
                blur: style.backdrop_blur,
                entries: stats.summary_lines().to_vec(),
            }
        });

        Self {
            width: layout.width,
            height: layout.height,
            metrics: *metrics,
            options_bar: layout.options_bar,
            cards,
            stats_bar,
        }
    }

    /// Distinct image files referenced by loaded tiles.
    pub fn image_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .cards
            .iter()
            .flat_map(|c| c.tiles.iter())
            .filter_map(|t| t.image.clone())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }
}
