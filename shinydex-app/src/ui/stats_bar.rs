use eframe::egui;

use shinydex_core::Stats;

/// Bottom bar with the global totals. `blur` selects the translucent look.
pub(crate) fn draw(ui: &mut egui::Ui, rect: egui::Rect, stats: &Stats, blur: bool) {
    // Swallow clicks so tiles underneath are not toggled.
    ui.interact(rect, ui.id().with("stats_bar"), egui::Sense::click());

    let fill = if blur {
        egui::Color32::from_rgba_unmultiplied(20, 20, 20, 215)
    } else {
        egui::Color32::from_rgb(20, 20, 20)
    };
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, fill);

    let entries = stats.summary_lines();
    let slot = rect.width() / entries.len() as f32;
    for (i, text) in entries.iter().enumerate() {
        painter.text(
            egui::pos2(rect.left() + slot * (i as f32 + 0.5), rect.center().y),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(16.0),
            egui::Color32::WHITE,
        );
    }
}
