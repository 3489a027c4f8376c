use eframe::egui;
use pdf_sign::{CapturedImage, DrawPad, Point, SessionConfig, capture_drawing, capture_typed};
use std::path::PathBuf;

#[derive(Default, PartialEq, Clone, Copy)]
enum CaptureTab {
    #[default]
    Draw,
    Type,
    Upload,
}

/// What the dialog asks of the app after a frame
pub enum DialogOutcome {
    Open,
    Cancelled,
    Captured(CapturedImage),
    /// Load this image in the worker and place it
    UploadRequested(PathBuf),
}

/// Draw / Type / Upload capture window
#[derive(Default)]
pub struct SignatureDialog {
    tab: CaptureTab,
    pad: DrawPad,
    text: String,
    error: Option<String>,
}

impl SignatureDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ctx: &egui::Context, config: &SessionConfig) -> DialogOutcome {
        let mut open = true;
        let mut outcome = DialogOutcome::Open;

        egui::Window::new("Add signature")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.tab, CaptureTab::Draw, "✍ Draw");
                    ui.selectable_value(&mut self.tab, CaptureTab::Type, "⌨ Type");
                    ui.selectable_value(&mut self.tab, CaptureTab::Upload, "🖼 Upload");
                });
                ui.separator();

                let result = match self.tab {
                    CaptureTab::Draw => self.show_draw(ui, config),
                    CaptureTab::Type => self.show_type(ui, config),
                    CaptureTab::Upload => Self::show_upload(ui),
                };
                match result {
                    Ok(DialogOutcome::Open) => {}
                    Ok(other) => outcome = other,
                    Err(message) => self.error = Some(message),
                }

                if let Some(error) = &self.error {
                    ui.separator();
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }
            });

        if !open {
            return DialogOutcome::Cancelled;
        }
        outcome
    }

    fn show_draw(
        &mut self,
        ui: &mut egui::Ui,
        config: &SessionConfig,
    ) -> Result<DialogOutcome, String> {
        ui.label("Draw your signature with the mouse or a stylus.");

        let (width, height) = self.pad.size();
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(width as f32, height as f32),
            egui::Sense::drag(),
        );
        let to_pad = |pos: egui::Pos2| Point::new(pos.x - rect.min.x, pos.y - rect.min.y);

        if let Some(pos) = response.interact_pointer_pos() {
            if response.drag_started() {
                self.pad.begin_stroke(to_pad(pos));
                self.error = None;
            } else if response.dragged() {
                self.pad.extend_stroke(to_pad(pos));
            }
        }
        if response.drag_stopped() {
            self.pad.end_stroke();
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, egui::Color32::WHITE);
        painter.rect_stroke(
            rect,
            4.0,
            egui::Stroke::new(1.0, egui::Color32::from_gray(180)),
            egui::StrokeKind::Inside,
        );
        let ink = egui::Stroke::new(config.draw_stroke_width, egui::Color32::BLACK);
        for stroke in self.pad.strokes() {
            let points: Vec<egui::Pos2> = stroke
                .iter()
                .map(|p| egui::pos2(rect.min.x + p.x, rect.min.y + p.y))
                .collect();
            match points.as_slice() {
                [] => {}
                [dot] => {
                    let radius = config.draw_stroke_width / 2.0;
                    painter.circle_filled(*dot, radius, egui::Color32::BLACK);
                }
                _ => {
                    painter.add(egui::Shape::line(points, ink));
                }
            }
        }

        let mut outcome = DialogOutcome::Open;
        ui.horizontal(|ui| {
            if ui.button("Undo").clicked() {
                self.pad.undo();
            }
            if ui.button("Clear").clicked() {
                self.pad.clear();
            }
            if ui.button("Use drawing").clicked() {
                let ink = [0, 0, 0, 255];
                outcome = match capture_drawing(&self.pad, config.draw_stroke_width, ink) {
                    Ok(captured) => DialogOutcome::Captured(captured),
                    Err(e) => {
                        self.error = Some(e.to_string());
                        DialogOutcome::Open
                    }
                };
            }
        });
        Ok(outcome)
    }

    fn show_type(
        &mut self,
        ui: &mut egui::Ui,
        config: &SessionConfig,
    ) -> Result<DialogOutcome, String> {
        ui.label("Type your name.");
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.text)
                .hint_text("Your name")
                .desired_width(320.0),
        );
        if response.changed() {
            self.error = None;
        }

        let submitted =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Use text").clicked() || submitted {
            return capture_typed(&self.text, &config.typed)
                .map(DialogOutcome::Captured)
                .map_err(|e| e.to_string());
        }
        Ok(DialogOutcome::Open)
    }

    fn show_upload(ui: &mut egui::Ui) -> Result<DialogOutcome, String> {
        ui.label("Upload a PNG or JPEG image of your signature.");
        if ui.button("Choose image...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Images", &["png", "jpg", "jpeg"])
                .pick_file()
            {
                return Ok(DialogOutcome::UploadRequested(path));
            }
        }
        Ok(DialogOutcome::Open)
    }
}
