pub(crate) mod export;
pub(crate) mod grid;
pub(crate) mod help;
pub(crate) mod options_bar;
pub(crate) mod stats_bar;

use eframe::egui;

/// A gesture collected while drawing, applied once the frame's widgets are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UiAction {
    TapTile(usize, usize),
    TapBadge(usize, usize),
    /// The editor on this tile lost focus.
    CommitEdit(usize, usize),
    CancelEdit,
    SetDesaturate(bool),
    Export,
    ToggleHelp,
}

pub(crate) const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x1a, 0x1a, 0x1a);
pub(crate) const CARD_FILL: egui::Color32 = egui::Color32::from_rgb(0x26, 0x26, 0x26);
pub(crate) const TILE_FILL: egui::Color32 = egui::Color32::from_rgb(0x33, 0x33, 0x33);
pub(crate) const OBTAINED_STROKE: egui::Color32 = egui::Color32::from_rgb(0xf5, 0xc5, 0x18);
pub(crate) const BADGE_FILL: egui::Color32 = egui::Color32::from_rgb(0xe5, 0x39, 0x35);
pub(crate) const MUTED_TEXT: egui::Color32 = egui::Color32::from_rgb(0xb0, 0xb0, 0xb0);

/// Document rect to screen rect, given the document origin on screen.
pub(crate) fn to_screen(origin: egui::Pos2, rect: &shinydex_render::Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}
