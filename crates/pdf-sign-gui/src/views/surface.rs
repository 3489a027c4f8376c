//! The signing surface: rendered pages stacked in a scroll area with the
//! session's overlays painted on top

use eframe::egui;
use pdf_async_runtime::{DocumentId, SourceDocument};
use pdf_sign::interaction::overlay_content_rect;
use pdf_sign::{
    LayoutOptions, LayoutSnapshot, NativePageSize, OverlayId, OverlayState, PageLayout, Point,
    RenderGate, RenderStatus, RenderTicket, ResizeHandle, Signature, SignatureId, SigningSession,
    Size, Viewport,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// Half the side of a resize handle, in layout pixels
const HANDLE_RADIUS: f32 = 5.0;
/// Space below the last page
const BOTTOM_PADDING: f32 = 24.0;

pub struct PageTexture {
    pub texture: egui::TextureHandle,
    pub size: egui::Vec2,
}

/// An open document as the UI sees it
pub struct SurfaceState {
    pub doc_id: DocumentId,
    pub path: PathBuf,
    pub file_name: String,
    pub document: SourceDocument,
    pub ticket: Option<RenderTicket>,
    pub pages: Vec<Option<PageTexture>>,
    signature_textures: HashMap<SignatureId, Option<egui::TextureHandle>>,
    pending_scroll: Option<f32>,
}

impl SurfaceState {
    pub fn new(
        doc_id: DocumentId,
        path: PathBuf,
        file_name: String,
        document: SourceDocument,
    ) -> Self {
        Self {
            doc_id,
            path,
            file_name,
            document,
            ticket: None,
            pages: Vec::new(),
            signature_textures: HashMap::new(),
            pending_scroll: None,
        }
    }

    /// Forget rendered pages ahead of a new render pass
    pub fn begin_render(&mut self, ticket: RenderTicket, page_count: usize) {
        self.ticket = Some(ticket);
        self.pages = (0..page_count).map(|_| None).collect();
    }

    pub fn set_page(&mut self, page_index: usize, page: PageTexture) -> bool {
        match self.pages.get_mut(page_index) {
            Some(slot) => {
                *slot = Some(page);
                true
            }
            None => false,
        }
    }

    /// Geometry of the laid-out column once every page has a texture
    fn measured_layout(&self, options: &LayoutOptions) -> Option<LayoutSnapshot> {
        let mut pages = Vec::with_capacity(self.pages.len());
        for (page_index, page) in self.pages.iter().enumerate() {
            let page = page.as_ref()?;
            let native = self
                .document
                .page_size(page_index)
                .unwrap_or_else(NativePageSize::default);
            pages.push((native, Size::new(page.size.x, page.size.y)));
        }
        if pages.is_empty() {
            return None;
        }

        // The column is as wide as the widest page so page boxes and bitmaps
        // line up; the column itself is centred in the panel
        let column_width = pages.iter().map(|(_, size)| size.width).fold(0.0, f32::max);
        Some(PageLayout::new(column_width, options).arrange(&pages))
    }

    fn signature_texture(
        &mut self,
        ctx: &egui::Context,
        signature: &Signature,
    ) -> Option<&egui::TextureHandle> {
        self.signature_textures
            .entry(signature.id)
            .or_insert_with(|| match image::load_from_memory(&signature.image) {
                Ok(img) => {
                    let rgba = img.to_rgba8();
                    let size = [rgba.width() as usize, rgba.height() as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                    Some(ctx.load_texture(
                        format!("signature_{}", signature.id.0),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ))
                }
                Err(e) => {
                    log::warn!("Cannot display {}: {}", signature.id, e);
                    None
                }
            })
            .as_ref()
    }
}

fn to_egui(rect: &pdf_sign::LayoutRect, origin: egui::Pos2) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(origin.x + rect.left, origin.y + rect.top),
        egui::vec2(rect.width, rect.height),
    )
}

/// Resize handle of the active overlay under a content-space point
fn handle_at(
    session: &SigningSession,
    snapshot: &LayoutSnapshot,
    id: OverlayId,
    at: Point,
) -> Option<ResizeHandle> {
    let overlay = session.overlays().get(id)?;
    let rect = overlay_content_rect(overlay, snapshot)?;
    ResizeHandle::ALL.into_iter().find(|handle| {
        let p = handle.position(&rect);
        (p.x - at.x).abs() <= HANDLE_RADIUS && (p.y - at.y).abs() <= HANDLE_RADIUS
    })
}

/// Scrollable extent of the column, including the space below the last page
fn scroll_extent(snapshot: &LayoutSnapshot) -> f32 {
    snapshot.content_height() + BOTTOM_PADDING
}

/// Viewport of a scroll area clipped at `clip_top` whose content column
/// starts at screen position `origin`
fn surface_viewport(
    origin: Point,
    clip_top: f32,
    clip_height: f32,
    snapshot: &LayoutSnapshot,
) -> Viewport {
    Viewport {
        left: origin.x,
        top: clip_top,
        height: clip_height,
        scroll_offset: clip_top - origin.y,
        content_height: scroll_extent(snapshot),
    }
}

/// Publish the measured geometry once every page has been rendered
pub fn publish_layout(state: &SurfaceState, gate: &RenderGate, options: &LayoutOptions) {
    let Some(ticket) = state.ticket else {
        return;
    };
    if !gate.all_rendered() {
        return;
    }
    if let Some(snapshot) = state.measured_layout(options) {
        if let Err(e) = gate.publish(ticket, snapshot) {
            log::debug!("Layout not published yet: {}", e);
        }
    }
}

pub fn show_surface(
    ui: &mut egui::Ui,
    state: &mut SurfaceState,
    session: &mut SigningSession,
    gate: &RenderGate,
) {
    let snapshot = match gate.status() {
        RenderStatus::Ready(snapshot) => snapshot,
        RenderStatus::Failed(message) => {
            ui.centered_and_justified(|ui| {
                ui.colored_label(ui.visuals().error_fg_color, message);
            });
            return;
        }
        RenderStatus::Rendering { rendered, total } => {
            ui.centered_and_justified(|ui| {
                ui.spinner();
                ui.label(format!(
                    "Rendering page {} of {}...",
                    (rendered + 1).min(total),
                    total
                ));
            });
            return;
        }
        RenderStatus::Preparing => {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }
    };

    let column_width = snapshot
        .pages()
        .iter()
        .map(|p| p.layout_rect.width)
        .fold(0.0, f32::max);
    let content_height = scroll_extent(&snapshot);

    let mut scroll = egui::ScrollArea::vertical()
        .id_salt("signing_surface")
        .auto_shrink([false; 2]);
    if let Some(offset) = state.pending_scroll.take() {
        scroll = scroll.vertical_scroll_offset(offset);
    }

    scroll.show(ui, |ui| {
        let width = ui.available_width().max(column_width);
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(width, content_height),
            egui::Sense::click_and_drag(),
        );
        let origin = egui::pos2(rect.min.x + (width - column_width) / 2.0, rect.min.y);
        let clip = ui.clip_rect();
        let viewport = surface_viewport(
            Point::new(origin.x, origin.y),
            clip.top(),
            clip.height(),
            &snapshot,
        );

        // Pointer gestures
        let pointer = response
            .interact_pointer_pos()
            .map(|pos| Point::new(pos.x, pos.y));

        if response.drag_started() {
            if let Some(pointer) = pointer {
                let at = viewport.to_content(pointer);
                let handle = session
                    .active()
                    .and_then(|id| handle_at(session, &snapshot, id, at).map(|h| (id, h)));
                let started = match handle {
                    Some((id, handle)) => session.begin_resize(id, handle, pointer),
                    None => match session.pointer_down(at, &snapshot) {
                        Some(id) => session.begin_drag(id, pointer, &viewport, &snapshot),
                        None => Ok(()),
                    },
                };
                if let Err(e) = started {
                    log::warn!("Cannot start gesture: {}", e);
                }
            }
        } else if response.clicked() {
            if let Some(pointer) = pointer {
                session.pointer_down(viewport.to_content(pointer), &snapshot);
            }
        }

        if response.dragged() && session.is_dragging() {
            if let Some(pointer) = pointer {
                if let Err(e) = session.drag_to(pointer, &viewport, &snapshot) {
                    log::warn!("Drag failed: {}", e);
                    session.end_gesture();
                }
            }
        }
        if response.drag_stopped() {
            session.end_gesture();
        }

        if session.is_dragging() {
            let mut scrolled = viewport;
            if session.autoscroll_frame(&mut scrolled, &snapshot) {
                state.pending_scroll = Some(scrolled.scroll_offset);
                ui.ctx().request_repaint();
            }
        }

        // Pages
        let painter = ui.painter();
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        for page in snapshot.pages() {
            let page_rect = to_egui(&page.bitmap_rect, origin);
            match state.pages.get(page.page_index).and_then(Option::as_ref) {
                Some(rendered) => {
                    painter.image(rendered.texture.id(), page_rect, uv, egui::Color32::WHITE);
                }
                None => {
                    painter.rect_filled(page_rect, 0.0, egui::Color32::WHITE);
                }
            }
            painter.rect_stroke(
                page_rect,
                0.0,
                egui::Stroke::new(1.0, egui::Color32::from_gray(160)),
                egui::StrokeKind::Outside,
            );
        }

        // Overlays, in placement order so later ones are on top
        let active = session.active();
        let ctx = ui.ctx().clone();
        for overlay in session.overlays().list() {
            if overlay.state == OverlayState::PendingReveal {
                continue;
            }
            let Some(rect) = overlay_content_rect(overlay, &snapshot) else {
                continue;
            };
            let screen_rect = to_egui(&rect, origin);

            let texture = session
                .signature(overlay.signature)
                .and_then(|signature| state.signature_texture(&ctx, signature));
            match texture {
                Some(texture) => {
                    egui::Image::new((texture.id(), screen_rect.size()))
                        .rotate(overlay.rotation_degrees.to_radians(), egui::Vec2::splat(0.5))
                        .paint_at(ui, screen_rect);
                }
                None => {
                    ui.painter().rect_filled(
                        screen_rect,
                        0.0,
                        egui::Color32::from_rgba_unmultiplied(200, 0, 0, 60),
                    );
                }
            }

            if active == Some(overlay.id) {
                let accent = ui.visuals().selection.stroke.color;
                ui.painter().rect_stroke(
                    screen_rect,
                    0.0,
                    egui::Stroke::new(1.5, accent),
                    egui::StrokeKind::Outside,
                );
                for handle in ResizeHandle::ALL {
                    let p = handle.position(&rect);
                    let handle_rect = egui::Rect::from_center_size(
                        egui::pos2(origin.x + p.x, origin.y + p.y),
                        egui::Vec2::splat(HANDLE_RADIUS * 2.0),
                    );
                    ui.painter().rect_filled(handle_rect, 1.0, egui::Color32::WHITE);
                    ui.painter().rect_stroke(
                        handle_rect,
                        1.0,
                        egui::Stroke::new(1.0, accent),
                        egui::StrokeKind::Inside,
                    );
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_sign::AutoScroll;

    fn two_page_snapshot() -> LayoutSnapshot {
        let page = (NativePageSize::default(), Size::new(800.0, 1035.0));
        PageLayout::new(800.0, &LayoutOptions::default()).arrange(&[page, page])
    }

    #[test]
    fn test_viewport_covers_bottom_padding() {
        let snapshot = two_page_snapshot();
        let viewport = surface_viewport(Point::new(0.0, 40.0), 40.0, 600.0, &snapshot);
        assert_eq!(viewport.scroll_offset, 0.0);
        assert_eq!(
            viewport.content_height,
            snapshot.content_height() + BOTTOM_PADDING
        );
    }

    #[test]
    fn test_autoscroll_reaches_end_of_scroll_area() {
        let snapshot = two_page_snapshot();
        let mut viewport = surface_viewport(Point::new(0.0, 0.0), 0.0, 600.0, &snapshot);
        let mut scroll = AutoScroll::new(0.10, 18.0);

        // Pointer pinned to the bottom edge until the loop stops itself
        scroll.update_pointer(599.0, &viewport);
        let mut frames = 0;
        while scroll.frame(&mut viewport) {
            frames += 1;
            assert!(frames < 1000);
        }

        let allocated = snapshot.content_height() + BOTTOM_PADDING;
        assert_eq!(viewport.scroll_offset, allocated - 600.0);
    }
}
