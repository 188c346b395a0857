use eframe::egui;

use crate::app::ShinyDexApp;

impl ShinyDexApp {
    pub(crate) fn show_help_window(&mut self, ctx: &egui::Context) {
        if !self.show_help {
            return;
        }

        let mut open = true;
        egui::Window::new("How to use")
            .open(&mut open)
            .resizable(false)
            .default_width(320.0)
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_rgba_unmultiplied(10, 10, 10, 210)),
            )
            .show(ctx, |ui| {
                ui.style_mut().visuals.override_text_color =
                    Some(egui::Color32::from_rgb(220, 220, 220));

                ui.heading("Mouse");
                ui.add_space(2.0);
                egui::Grid::new("help_mouse")
                    .num_columns(2)
                    .spacing([12.0, 2.0])
                    .show(ui, |ui| {
                        let actions: &[(&str, &str)] = &[
                            ("Click tile", "Mark obtained / clear"),
                            ("Click badge", "Edit the count"),
                        ];
                        for &(k, d) in actions {
                            ui.label(
                                egui::RichText::new(k).strong().color(egui::Color32::WHITE),
                            );
                            ui.label(d);
                            ui.end_row();
                        }
                    });

                ui.add_space(8.0);
                ui.heading("Keyboard");
                ui.add_space(2.0);
                egui::Grid::new("help_kb")
                    .num_columns(2)
                    .spacing([12.0, 2.0])
                    .show(ui, |ui| {
                        let keys: &[(&str, &str)] = &[
                            ("Enter", "Confirm the count"),
                            ("Esc", "Discard the edit"),
                            ("Ctrl+S", "Save as image"),
                        ];
                        for &(k, d) in keys {
                            ui.label(
                                egui::RichText::new(k).strong().color(egui::Color32::WHITE),
                            );
                            ui.label(d);
                            ui.end_row();
                        }
                    });

                ui.add_space(8.0);
                ui.label("A count of 0 or less removes the tile from your collection.");
                ui.label(format!(
                    "Snapshots are saved to {}",
                    crate::app_dir::images_directory().display()
                ));
            });

        if !open {
            self.show_help = false;
        }
    }
}
