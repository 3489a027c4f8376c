use eframe::egui;
use pdf_async_runtime::{DocumentId, SignCommand, SignUpdate};
use pdf_sign::{CapturedImage, RenderGate, SigningSession};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views::{
    DialogOutcome, PageTexture, SignatureDialog, SurfaceState, publish_layout, show_log_window,
    show_surface,
};

#[derive(Clone)]
struct ProgressState {
    operation: String,
    current: usize,
    total: usize,
}

pub struct SignApp {
    status: String,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<SignCommand>,
    update_rx: mpsc::UnboundedReceiver<SignUpdate>,

    // Progress tracking
    progress: Option<ProgressState>,

    // Signing state
    session: SigningSession,
    gate: RenderGate,
    surface: Option<SurfaceState>,
    dialog: Option<SignatureDialog>,

    logger: AppLogger,
    show_log: bool,

    _tokio_handle: tokio::runtime::Handle,
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

impl SignApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
        initial_document: Option<PathBuf>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        let mut app = Self {
            status: String::new(),
            command_tx,
            update_rx,
            progress: None,
            session: SigningSession::default(),
            gate: RenderGate::new(),
            surface: None,
            dialog: None,
            logger,
            show_log: false,
            _tokio_handle: tokio_handle,
        };
        if let Some(path) = initial_document {
            app.open_document(path);
        }
        app
    }

    fn send(&mut self, command: SignCommand) {
        if self.command_tx.send(command).is_err() {
            log::error!("Worker is not running");
            self.status = "Error: background worker stopped".to_string();
        }
    }

    fn open_document(&mut self, path: PathBuf) {
        self.status = format!("Loading {}...", path.display());
        let render_width = self.session.config().layout.render_width;
        self.send(SignCommand::LoadDocument { path, render_width });
    }

    fn current_doc(&self) -> Option<DocumentId> {
        self.surface.as_ref().map(|surface| surface.doc_id)
    }

    /// Place a freshly captured signature on the default page
    fn place_signature(&mut self, captured: CapturedImage) {
        let Some(snapshot) = self.gate.snapshot() else {
            self.status = "Pages are still rendering".to_string();
            return;
        };
        match self
            .session
            .add_signature(captured, &snapshot, Instant::now())
        {
            Ok(_) => self.status = "Signature placed, drag it into position".to_string(),
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    fn save_signed_copy(&mut self) {
        let Some(surface) = &self.surface else {
            return;
        };
        let Some(snapshot) = self.gate.snapshot() else {
            self.status = "Pages are still rendering".to_string();
            return;
        };

        let mut picker = rfd::FileDialog::new().set_title("Save signed copy to");
        if let Some(parent) = surface.path.parent() {
            picker = picker.set_directory(parent);
        }
        let Some(output_dir) = picker.pick_folder() else {
            return;
        };

        let request = self.session.commit_request(&surface.document, &snapshot);
        let command = SignCommand::Commit {
            doc_id: surface.doc_id,
            request,
            output_dir,
            file_name: surface.file_name.clone(),
        };
        self.status = "Saving signed copy...".to_string();
        self.send(command);
    }

    fn close_document(&mut self) {
        if let Some(doc_id) = self.current_doc() {
            self.send(SignCommand::CloseDocument { doc_id });
        }
        self.session.close();
        self.gate.reset();
        self.surface = None;
        self.dialog = None;
    }

    fn handle_update(&mut self, ctx: &egui::Context, update: SignUpdate) {
        match update {
            SignUpdate::Progress {
                operation,
                current,
                total,
            } => {
                self.progress = Some(ProgressState {
                    operation,
                    current,
                    total,
                });
                ctx.request_repaint(); // Request another frame
            }
            SignUpdate::DocumentLoaded {
                doc_id,
                path,
                file_name,
                document,
            } => {
                if let Some(previous) = self.current_doc() {
                    self.send(SignCommand::CloseDocument { doc_id: previous });
                }
                self.session.close();
                self.gate.reset();
                self.status = format!("Loaded {} ({} pages)", file_name, document.page_count());
                self.surface = Some(SurfaceState::new(doc_id, path, file_name, document));
            }
            SignUpdate::RenderStarted {
                doc_id, page_count, ..
            } => {
                if let Some(surface) = self.surface.as_mut().filter(|s| s.doc_id == doc_id) {
                    let ticket = self.gate.begin(page_count);
                    surface.begin_render(ticket, page_count);
                }
            }
            SignUpdate::PageRendered {
                doc_id,
                page_index,
                width,
                height,
                rgba_data,
            } => {
                let Some(surface) = self.surface.as_mut().filter(|s| s.doc_id == doc_id) else {
                    return;
                };
                let Some(ticket) = surface.ticket else {
                    return;
                };
                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied([width, height], &rgba_data);
                let texture = ctx.load_texture(
                    format!("page_{}_{}", doc_id.0, page_index),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                let page = PageTexture {
                    texture,
                    size: egui::vec2(width as f32, height as f32),
                };
                if surface.set_page(page_index, page) {
                    self.gate.page_rendered(ticket, page_index);
                }
                self.progress = None;
            }
            SignUpdate::RenderFailed { doc_id, message } => {
                if let Some(ticket) = self
                    .surface
                    .as_ref()
                    .filter(|s| s.doc_id == doc_id)
                    .and_then(|s| s.ticket)
                {
                    self.gate.fail(ticket, message.clone());
                }
                self.status = format!("Error: {message}");
                self.progress = None;
            }
            SignUpdate::SignatureImageLoaded { captured } => {
                self.progress = None;
                self.place_signature(captured);
            }
            SignUpdate::ConfigLoaded { config } => {
                if self.session.overlays().is_empty() {
                    let render_width = config.layout.render_width;
                    let rerender = render_width != self.session.config().layout.render_width;
                    self.session = SigningSession::new(config);
                    self.status = "Settings loaded".to_string();
                    if let Some(doc_id) = self.current_doc().filter(|_| rerender) {
                        self.send(SignCommand::RenderPages {
                            doc_id,
                            render_width,
                        });
                    }
                } else {
                    self.status =
                        "Settings apply to new documents; clear placements first".to_string();
                }
            }
            SignUpdate::Committed { path, .. } => {
                self.status = format!("Signed → {}", path.display());
                self.progress = None;
            }
            SignUpdate::DocumentClosed { doc_id } => {
                log::debug!("Worker released {:?}", doc_id);
            }
            SignUpdate::Error { message } => {
                self.status = format!("Error: {message}");
                self.progress = None;
            }
        }
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("📂 Open").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PDF", &["pdf"])
                    .pick_file()
                {
                    self.open_document(path);
                }
            }

            let ready = self.surface.is_some() && self.gate.is_ready();
            let has_active = self.session.active().is_some();
            let has_overlays = !self.session.overlays().is_empty();

            ui.separator();
            if ui
                .add_enabled(ready, egui::Button::new("✍ Add signature"))
                .clicked()
            {
                self.dialog = Some(SignatureDialog::new());
            }
            if ui
                .add_enabled(has_active, egui::Button::new("⟳ Rotate"))
                .clicked()
            {
                self.session.rotate_active();
            }
            if ui
                .add_enabled(has_active, egui::Button::new("🗑 Delete"))
                .clicked()
            {
                self.session.remove_active();
            }
            if ui
                .add_enabled(has_overlays, egui::Button::new("Clear all"))
                .clicked()
            {
                self.session.clear();
            }

            ui.separator();
            if ui
                .add_enabled(ready, egui::Button::new("💾 Save signed copy"))
                .clicked()
            {
                self.save_signed_copy();
            }
            if ui
                .add_enabled(self.surface.is_some(), egui::Button::new("✖ Close"))
                .clicked()
            {
                self.close_document();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.toggle_value(&mut self.show_log, "Log");
                if ui.button("Load settings").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON", &["json"])
                        .pick_file()
                    {
                        self.send(SignCommand::LoadConfig { path });
                    }
                }
            });
        });
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (delete, rotate) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::R),
            )
        });
        if delete {
            self.session.remove_active();
        }
        if rotate {
            self.session.rotate_active();
        }
    }
}

impl eframe::App for SignApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle drag-and-drop for PDF files
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .filter(|path| is_pdf(path))
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            self.open_document(path);
        }

        // Process all pending updates from worker
        while let Ok(update) = self.update_rx.try_recv() {
            self.handle_update(ctx, update);
        }

        if self.dialog.is_none() {
            self.handle_keys(ctx);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.show_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(ref progress) = self.progress {
                ui.label(&progress.operation);
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .show_percentage(),
                );
                ctx.request_repaint(); // Keep updating during operations
            }
            ui.horizontal(|ui| {
                if !self.status.is_empty() {
                    ui.label(&self.status);
                } else if let Some(message) = self.logger.latest_message() {
                    ui.weak(message);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.surface.as_mut() {
            Some(surface) => {
                publish_layout(surface, &self.gate, &self.session.config().layout);
                show_surface(ui, surface, &mut self.session, &self.gate);
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("Open or drop a PDF to sign it");
                });
            }
        });

        if let Some(dialog) = self.dialog.as_mut() {
            match dialog.show(ctx, self.session.config()) {
                DialogOutcome::Open => {}
                DialogOutcome::Cancelled => self.dialog = None,
                DialogOutcome::Captured(captured) => {
                    self.dialog = None;
                    self.place_signature(captured);
                }
                DialogOutcome::UploadRequested(path) => {
                    self.dialog = None;
                    self.status = format!("Loading {}...", path.display());
                    self.send(SignCommand::LoadSignatureImage { path });
                }
            }
        }

        show_log_window(ctx, &mut self.show_log, &self.logger);

        // New placements appear once their settle delay has passed
        if self.session.tick(Instant::now()) {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}
