//! The scrollable document: options bar, region cards, tile grid.

use eframe::egui;

use shinydex_render::{DocumentLayout, Loading, Placement, Surface, TileView};

use crate::app::{Content, ShinyDexApp};
use crate::interaction::Editor;
use crate::textures::TextureCache;
use crate::ui::{
    options_bar, stats_bar, to_screen, UiAction, BACKGROUND, BADGE_FILL, CARD_FILL,
    MUTED_TEXT, OBTAINED_STROKE, TILE_FILL,
};

impl ShinyDexApp {
    pub(crate) fn draw_grid(&mut self, ctx: &egui::Context) {
        let Content::Ready(dex) = &mut self.content else {
            return;
        };
        let surface = &mut self.surface;
        let textures = &mut self.textures;
        let metrics = self.metrics;
        let scroll_override = self.scroll_override.take();
        let mut editor = dex.editor().cloned();
        let mut actions = Vec::new();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(BACKGROUND))
            .show(ctx, |ui| {
                let panel = ui.max_rect();
                surface.viewport_height = panel.height();

                let mut area = egui::ScrollArea::vertical().auto_shrink([false, false]);
                if let Some(offset) = scroll_override {
                    area = area.vertical_scroll_offset(offset);
                }
                let output = area.show(ui, |ui| {
                    surface.viewport_width = ui.available_width();
                    let layout = DocumentLayout::compute(
                        dex.view(),
                        surface.viewport_width,
                        &metrics,
                        surface.options_bar_shown(),
                    );
                    let (doc_rect, _) = ui.allocate_exact_size(
                        egui::vec2(layout.width, layout.height),
                        egui::Sense::hover(),
                    );
                    let origin = doc_rect.min;

                    if let Some(bar) = &layout.options_bar {
                        options_bar::draw(
                            ui,
                            to_screen(origin, bar),
                            dex.tracker().config().desaturate_on_single_count,
                            surface.trigger.as_ref(),
                            &mut actions,
                        );
                    }

                    for (r, (region, card)) in dex.view().regions.iter().zip(&layout.cards).enumerate() {
                        let card_rect = to_screen(origin, &card.rect);
                        let editing_here = editor.as_ref().is_some_and(|e| e.region == r);
                        if !ui.is_rect_visible(card_rect) && !has_eager(surface, r) && !editing_here {
                            continue;
                        }
                        ui.painter()
                            .rect_filled(card_rect, metrics.corner_radius, CARD_FILL);
                        let header = to_screen(origin, &card.header);
                        ui.painter().text(
                            header.left_center(),
                            egui::Align2::LEFT_CENTER,
                            &region.name,
                            egui::FontId::proportional(18.0),
                            egui::Color32::WHITE,
                        );
                        ui.painter().text(
                            header.right_center(),
                            egui::Align2::RIGHT_CENTER,
                            region.progress.label(),
                            egui::FontId::proportional(15.0),
                            MUTED_TEXT,
                        );

                        for (i, (tile, rect)) in region.tiles.iter().zip(&card.tiles).enumerate() {
                            let tile_rect = to_screen(origin, rect);
                            let state = TileState {
                                position: (r, i),
                                rect: tile_rect,
                                loading: surface.images.get(&(r, i)).copied(),
                                badge_radius: metrics.badge_radius,
                                corner_radius: metrics.corner_radius / 2.0,
                            };
                            draw_tile(ui, textures, tile, &state, editor.as_mut(), &mut actions);
                        }
                    }

                    if let Some(style) = surface.stats_bar.as_ref().and_then(|b| b.style) {
                        if let Placement::Absolute { top } = style.placement {
                            let rect = egui::Rect::from_min_size(
                                origin + egui::vec2(0.0, top),
                                egui::vec2(layout.width, metrics.stats_bar_height),
                            );
                            stats_bar::draw(ui, rect, dex.stats(), style.backdrop_blur);
                        }
                    }
                });
                surface.scroll_offset = output.state.offset.y;

                if let Some(bar) = &surface.stats_bar {
                    let style = bar.effective_style();
                    if style.placement == Placement::Sticky {
                        let rect = egui::Rect::from_min_max(
                            egui::pos2(panel.left(), panel.bottom() - metrics.stats_bar_height),
                            panel.right_bottom(),
                        );
                        stats_bar::draw(ui, rect, dex.stats(), style.backdrop_blur);
                    }
                }
            });

        if let (Some(drawn), Some(live)) = (editor, dex.editor_mut()) {
            live.text = drawn.text;
            live.wants_focus = drawn.wants_focus;
        }
        for action in actions {
            self.apply_action(ctx, action);
        }
    }

    pub(crate) fn apply_action(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::Export => self.start_export(ctx),
            UiAction::ToggleHelp => self.show_help = !self.show_help,
            _ => {
                if let Content::Ready(dex) = &mut self.content {
                    dex.apply(action);
                }
            }
        }
    }
}

fn has_eager(surface: &Surface, region: usize) -> bool {
    surface
        .images
        .range((region, 0)..(region + 1, 0))
        .any(|(_, &loading)| loading == Loading::Eager)
}

/// Off-screen lazy tiles are skipped, except the one holding the open
/// editor: an undrawn text field loses focus without reporting it.
fn needs_draw(visible: bool, loading: Option<Loading>, editing: bool) -> bool {
    visible || editing || loading != Some(Loading::Lazy)
}

/// What happened to one tile this frame.
#[derive(Debug, Clone, Copy, Default)]
struct TileInput {
    body_clicked: bool,
    badge_clicked: bool,
    escape_pressed: bool,
    editor_lost_focus: bool,
}

/// The gesture a tile reports, if any. An editing tile only reports editor
/// events; a badge click shadows the body underneath it.
fn tile_action(position: (usize, usize), editing: bool, input: TileInput) -> Option<UiAction> {
    let (r, i) = position;
    if editing {
        if input.escape_pressed {
            Some(UiAction::CancelEdit)
        } else if input.editor_lost_focus {
            Some(UiAction::CommitEdit(r, i))
        } else {
            None
        }
    } else if input.badge_clicked {
        Some(UiAction::TapBadge(r, i))
    } else if input.body_clicked {
        Some(UiAction::TapTile(r, i))
    } else {
        None
    }
}

struct TileState {
    position: (usize, usize),
    rect: egui::Rect,
    loading: Option<Loading>,
    badge_radius: f32,
    corner_radius: f32,
}

fn draw_tile(
    ui: &mut egui::Ui,
    textures: &mut TextureCache,
    tile: &TileView,
    state: &TileState,
    editor: Option<&mut Editor>,
    actions: &mut Vec<UiAction>,
) {
    let (r, i) = state.position;
    let rect = state.rect;
    let editor = editor.filter(|e| e.region == r && e.index == i);
    if !needs_draw(ui.is_rect_visible(rect), state.loading, editor.is_some()) {
        return;
    }

    let id = ui.id().with(("tile", r, i));
    let body = ui
        .interact(rect, id, egui::Sense::click())
        .on_hover_text(format!("ID: {}", tile.id));
    let painter = ui.painter().clone();
    painter.rect_filled(rect, state.corner_radius, TILE_FILL);

    if let Some(texture) = textures.get(ui.ctx(), &tile.image, tile.desaturated) {
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
    }
    if tile.obtained() {
        painter.rect_stroke(
            rect.shrink(1.0),
            state.corner_radius,
            egui::Stroke::new(2.0, OBTAINED_STROKE),
            egui::StrokeKind::Inside,
        );
    }

    let mut input = TileInput {
        body_clicked: body.clicked(),
        ..TileInput::default()
    };
    let editing = editor.is_some();
    if let Some(editor) = editor {
        let edit_rect = egui::Rect::from_min_size(
            rect.right_top() + egui::vec2(-50.0, 2.0),
            egui::vec2(48.0, 22.0),
        );
        let response = ui.put(
            edit_rect,
            egui::TextEdit::singleline(&mut editor.text)
                .desired_width(44.0)
                .horizontal_align(egui::Align::Center),
        );
        if editor.wants_focus {
            response.request_focus();
            editor.wants_focus = false;
        }
        input.escape_pressed = ui.input(|inp| inp.key_pressed(egui::Key::Escape));
        input.editor_lost_focus = response.lost_focus();
    } else if let Some(count) = tile.badge {
        let radius = state.badge_radius;
        let center = rect.right_top() + egui::vec2(-radius, radius);
        painter.circle_filled(center, radius, BADGE_FILL);
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            count.to_string(),
            egui::FontId::proportional(12.0),
            egui::Color32::WHITE,
        );
        let badge_rect = egui::Rect::from_center_size(center, egui::Vec2::splat(radius * 2.0));
        input.badge_clicked = ui
            .interact(badge_rect, id.with("badge"), egui::Sense::click())
            .clicked();
    }

    actions.extend(tile_action(state.position, editing, input));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offscreen_lazy_tile_is_skipped() {
        assert!(!needs_draw(false, Some(Loading::Lazy), false));
        assert!(needs_draw(true, Some(Loading::Lazy), false));
        assert!(needs_draw(false, Some(Loading::Eager), false));
        assert!(needs_draw(false, None, false));
    }

    #[test]
    fn offscreen_tile_with_open_editor_is_drawn() {
        assert!(needs_draw(false, Some(Loading::Lazy), true));
    }

    #[test]
    fn badge_click_shadows_body() {
        let input = TileInput {
            body_clicked: true,
            badge_clicked: true,
            ..TileInput::default()
        };
        assert_eq!(tile_action((1, 4), false, input), Some(UiAction::TapBadge(1, 4)));

        let input = TileInput {
            body_clicked: true,
            ..TileInput::default()
        };
        assert_eq!(tile_action((1, 4), false, input), Some(UiAction::TapTile(1, 4)));
        assert_eq!(tile_action((1, 4), false, TileInput::default()), None);
    }

    #[test]
    fn editing_tile_reports_only_editor_events() {
        let clicked = TileInput {
            body_clicked: true,
            ..TileInput::default()
        };
        assert_eq!(tile_action((0, 2), true, clicked), None);

        let blurred = TileInput {
            editor_lost_focus: true,
            ..TileInput::default()
        };
        assert_eq!(tile_action((0, 2), true, blurred), Some(UiAction::CommitEdit(0, 2)));

        let escaped = TileInput {
            escape_pressed: true,
            editor_lost_focus: true,
            ..TileInput::default()
        };
        assert_eq!(tile_action((0, 2), true, escaped), Some(UiAction::CancelEdit));
    }

    #[test]
    fn frame_actions_follow_draw_order() {
        // Tile (0, 0) is drawn before (0, 2); a click on its badge also
        // surrenders the focus of the editor on (0, 2).
        let badge = TileInput {
            badge_clicked: true,
            ..TileInput::default()
        };
        let blurred = TileInput {
            editor_lost_focus: true,
            ..TileInput::default()
        };
        let actions: Vec<_> = [((0, 0), false, badge), ((0, 2), true, blurred)]
            .into_iter()
            .filter_map(|(pos, editing, input)| tile_action(pos, editing, input))
            .collect();
        assert_eq!(
            actions,
            vec![UiAction::TapBadge(0, 0), UiAction::CommitEdit(0, 2)]
        );
    }
}
