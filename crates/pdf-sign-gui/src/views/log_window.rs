use crate::logger::AppLogger;
use eframe::egui;
use log::Level;

fn level_color(ui: &egui::Ui, level: Level) -> egui::Color32 {
    match level {
        Level::Error => ui.visuals().error_fg_color,
        Level::Warn => ui.visuals().warn_fg_color,
        _ => ui.visuals().text_color(),
    }
}

/// Recent log records, newest at the bottom
pub fn show_log_window(ctx: &egui::Context, open: &mut bool, logger: &AppLogger) {
    egui::Window::new("Log")
        .open(open)
        .default_size([520.0, 260.0])
        .show(ctx, |ui| {
            if ui.button("Clear").clicked() {
                logger.clear();
            }
            ui.separator();

            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for entry in logger.entries() {
                        ui.horizontal(|ui| {
                            ui.monospace(entry.timestamp.format("%H:%M:%S").to_string());
                            ui.colored_label(level_color(ui, entry.level), entry.level.as_str());
                            ui.label(&entry.message);
                        });
                    }
                });
        });
}
