use eframe::egui;
use egui_material_icons::icons::{ICON_HELP_OUTLINE, ICON_PHOTO_CAMERA};

use shinydex_render::TriggerControl;

use crate::ui::UiAction;

/// Header bar: desaturation checkbox, export trigger, help.
pub(crate) fn draw(
    ui: &mut egui::Ui,
    rect: egui::Rect,
    desaturate: bool,
    trigger: Option<&TriggerControl>,
    actions: &mut Vec<UiAction>,
) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_rgb(0x20, 0x20, 0x20));
    let inner = rect.shrink2(egui::vec2(16.0, 6.0));
    ui.scope_builder(egui::UiBuilder::new().max_rect(inner), |ui| {
        ui.horizontal_centered(|ui| {
            ui.label(egui::RichText::new("ShinyDex").strong().size(16.0));
            ui.add_space(16.0);

            let mut value = desaturate;
            if ui
                .checkbox(&mut value, "Grey out single-count tiles")
                .changed()
            {
                actions.push(UiAction::SetDesaturate(value));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(egui::RichText::new(ICON_HELP_OUTLINE).size(18.0))
                    .on_hover_text("Help")
                    .clicked()
                {
                    actions.push(UiAction::ToggleHelp);
                }
                if let Some(trigger) = trigger {
                    let label = format!("{ICON_PHOTO_CAMERA} {}", trigger.label);
                    let button = ui.add_enabled(trigger.enabled, egui::Button::new(label));
                    if button.on_hover_text("Ctrl+S").clicked() {
                        actions.push(UiAction::Export);
                    }
                }
            });
        });
    });
}
