//! Signing session state
//!
//! Everything that would otherwise be ambient UI state lives here: captured
//! signatures, the overlay store, the gesture in progress, the last pointer
//! position and the auto-scroll loop. Geometry is passed in by the caller
//! on every call so the session never holds a stale snapshot.

use crate::autoscroll::{AutoScroll, Viewport};
use crate::capture::CapturedImage;
use crate::compose::{CommitRequest, compose};
use crate::config::SessionConfig;
use crate::document::SourceDocument;
use crate::geometry::{LayoutSnapshot, PageGeometryProvider};
use crate::interaction::{ResizeHandle, hit_test, overlay_content_rect, resize_rect, retarget};
use crate::overlay::{OverlayPatch, OverlayStore};
use crate::types::*;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    /// `grab` is the pointer's offset from the overlay's top-left corner
    Drag { overlay: OverlayId, grab: Point },
    Resize {
        overlay: OverlayId,
        handle: ResizeHandle,
    },
}

impl Gesture {
    fn overlay(&self) -> OverlayId {
        match self {
            Gesture::Drag { overlay, .. } | Gesture::Resize { overlay, .. } => *overlay,
        }
    }
}

pub struct SigningSession {
    config: SessionConfig,
    signatures: HashMap<SignatureId, Signature>,
    next_signature_id: u64,
    overlays: OverlayStore,
    gesture: Option<Gesture>,
    /// Screen position of the pointer at the last gesture update
    last_pointer: Option<Point>,
    autoscroll: AutoScroll,
}

impl Default for SigningSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SigningSession {
    pub fn new(config: SessionConfig) -> Self {
        let autoscroll = AutoScroll::from_config(&config);
        Self {
            config,
            signatures: HashMap::new(),
            next_signature_id: 0,
            overlays: OverlayStore::new(),
            gesture: None,
            last_pointer: None,
            autoscroll,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn overlays(&self) -> &OverlayStore {
        &self.overlays
    }

    pub fn signatures(&self) -> &HashMap<SignatureId, Signature> {
        &self.signatures
    }

    pub fn signature(&self, id: SignatureId) -> Option<&Signature> {
        self.signatures.get(&id)
    }

    pub fn active(&self) -> Option<OverlayId> {
        self.overlays.active()
    }

    // =========================================================================
    // Capture and placement
    // =========================================================================

    /// Take ownership of a captured image as a new signature
    pub fn register(&mut self, captured: CapturedImage) -> SignatureId {
        let id = SignatureId(self.next_signature_id);
        self.next_signature_id += 1;
        log::info!(
            "Registered {:?} {} ({}x{})",
            captured.source,
            id,
            captured.width,
            captured.height
        );
        self.signatures.insert(id, captured.into_signature(id));
        id
    }

    /// Place a registered signature at the default page and position, sized
    /// for its capture mode. The overlay is selected and pending reveal.
    pub fn place(
        &mut self,
        signature: SignatureId,
        snapshot: &LayoutSnapshot,
        now: Instant,
    ) -> Result<OverlayId> {
        let source = self
            .signatures
            .get(&signature)
            .ok_or(SignError::UnknownSignature(signature))?
            .source;

        if snapshot.page_count() == 0 {
            return Err(SignError::NotReady);
        }
        let page_index = self.config.default_page.min(snapshot.page_count() - 1);
        let (x, y) = self.config.default_position;
        let size = self.config.default_size(source);

        let id = self
            .overlays
            .create(signature, page_index, Point::new(x, y), size, now);
        self.overlays.set_active(Some(id));
        log::info!("Placed {} as {} on page {}", signature, id, page_index + 1);
        Ok(id)
    }

    /// Register a capture and place it in one step
    pub fn add_signature(
        &mut self,
        captured: CapturedImage,
        snapshot: &LayoutSnapshot,
        now: Instant,
    ) -> Result<OverlayId> {
        let signature = self.register(captured);
        self.place(signature, snapshot, now)
    }

    /// Reveal overlays whose settle delay elapsed. Returns whether any
    /// overlay is still pending (the host should tick again).
    pub fn tick(&mut self, now: Instant) -> bool {
        self.overlays.reveal_settled(now, self.config.reveal_delay());
        self.overlays.has_pending()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select the topmost overlay under a content-space point, or clear the
    /// selection when the point hits empty canvas
    pub fn pointer_down(&mut self, at: Point, snapshot: &LayoutSnapshot) -> Option<OverlayId> {
        let hit = hit_test(&self.overlays, snapshot, at);
        self.overlays.set_active(hit);
        hit
    }

    pub fn select(&mut self, id: Option<OverlayId>) {
        self.overlays.set_active(id);
    }

    // =========================================================================
    // Drag
    // =========================================================================

    /// Start dragging `id` with the pointer at screen position `pointer`
    pub fn begin_drag(
        &mut self,
        id: OverlayId,
        pointer: Point,
        viewport: &Viewport,
        snapshot: &LayoutSnapshot,
    ) -> Result<()> {
        let overlay = self.overlays.get(id).ok_or(SignError::UnknownOverlay(id))?;
        let rect = overlay_content_rect(overlay, snapshot).ok_or(
            SignError::GeometryUnavailable {
                overlay: id,
                page: overlay.page_index,
            },
        )?;

        let content = viewport.to_content(pointer);
        self.gesture = Some(Gesture::Drag {
            overlay: id,
            grab: Point::new(content.x - rect.left, content.y - rect.top),
        });
        self.last_pointer = Some(pointer);
        self.overlays.set_active(Some(id));
        Ok(())
    }

    /// Move the dragged overlay so it follows the pointer, re-parenting it to
    /// whichever page now holds its vertical centre
    pub fn drag_to(
        &mut self,
        pointer: Point,
        viewport: &Viewport,
        snapshot: &LayoutSnapshot,
    ) -> Result<()> {
        self.last_pointer = Some(pointer);
        if self.gesture.is_some() {
            self.autoscroll.update_pointer(pointer.y, viewport);
        }
        self.apply_gesture(pointer, viewport, snapshot)
    }

    // =========================================================================
    // Resize
    // =========================================================================

    pub fn begin_resize(
        &mut self,
        id: OverlayId,
        handle: ResizeHandle,
        pointer: Point,
    ) -> Result<()> {
        if self.overlays.get(id).is_none() {
            return Err(SignError::UnknownOverlay(id));
        }
        self.gesture = Some(Gesture::Resize {
            overlay: id,
            handle,
        });
        self.last_pointer = Some(pointer);
        self.overlays.set_active(Some(id));
        Ok(())
    }

    /// Move the active resize handle to the pointer. The opposite corner or
    /// edge stays put.
    pub fn resize_to(
        &mut self,
        pointer: Point,
        viewport: &Viewport,
        snapshot: &LayoutSnapshot,
    ) -> Result<()> {
        self.drag_to(pointer, viewport, snapshot)
    }

    /// Finish the current drag or resize and stop auto-scrolling
    pub fn end_gesture(&mut self) {
        self.gesture = None;
        self.last_pointer = None;
        self.autoscroll.cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    // =========================================================================
    // Auto-scroll
    // =========================================================================

    /// Run one auto-scroll frame. The viewport is scrolled in place and the
    /// gesture is re-applied so the overlay keeps up with the content.
    /// Returns whether another frame should be scheduled.
    pub fn autoscroll_frame(&mut self, viewport: &mut Viewport, snapshot: &LayoutSnapshot) -> bool {
        if self.gesture.is_none() {
            self.autoscroll.cancel();
            return false;
        }
        let running = self.autoscroll.frame(viewport);
        if let Some(pointer) = self.last_pointer {
            if let Err(e) = self.apply_gesture(pointer, viewport, snapshot) {
                log::warn!("Auto-scroll could not move overlay: {}", e);
                self.end_gesture();
                return false;
            }
        }
        running
    }

    pub fn is_autoscrolling(&self) -> bool {
        self.autoscroll.is_running()
    }

    // =========================================================================
    // Rotation and removal
    // =========================================================================

    /// Rotate by one step, wrapping at 360°. Returns the new angle.
    pub fn rotate(&mut self, id: OverlayId) -> Result<f32> {
        let current = self
            .overlays
            .get(id)
            .ok_or(SignError::UnknownOverlay(id))?
            .rotation_degrees;
        let overlay = self.overlays.update(
            id,
            OverlayPatch::rotation(current + self.config.rotate_step_degrees),
        )?;
        Ok(overlay.rotation_degrees)
    }

    pub fn rotate_active(&mut self) -> Option<f32> {
        let id = self.overlays.active()?;
        self.rotate(id).ok()
    }

    pub fn remove(&mut self, id: OverlayId) -> Option<Overlay> {
        if self.gesture.is_some_and(|g| g.overlay() == id) {
            self.end_gesture();
        }
        self.overlays.remove(id)
    }

    pub fn remove_active(&mut self) -> Option<Overlay> {
        let id = self.overlays.active()?;
        self.remove(id)
    }

    /// Remove every overlay and deselect
    pub fn clear(&mut self) {
        self.end_gesture();
        self.overlays.clear();
        log::info!("Cleared all placements");
    }

    /// Tear the session down: stop the scroll loop and discard all
    /// signatures and placements without committing
    pub fn close(&mut self) {
        self.end_gesture();
        self.overlays.clear();
        self.signatures.clear();
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Bake every placement into a copy of `document`
    pub fn commit(
        &self,
        document: &SourceDocument,
        geometry: &dyn PageGeometryProvider,
    ) -> Result<Vec<u8>> {
        let overlays: Vec<Overlay> = self.overlays.list().cloned().collect();
        compose(document.bytes(), &overlays, &self.signatures, geometry)
    }

    /// Owned copy of everything a background commit needs
    pub fn commit_request(
        &self,
        document: &SourceDocument,
        geometry: &LayoutSnapshot,
    ) -> CommitRequest {
        CommitRequest {
            original: document.bytes().to_vec(),
            overlays: self.overlays.list().cloned().collect(),
            signatures: self.signatures.clone(),
            geometry: geometry.clone(),
        }
    }

    fn apply_gesture(
        &mut self,
        pointer: Point,
        viewport: &Viewport,
        snapshot: &LayoutSnapshot,
    ) -> Result<()> {
        let Some(gesture) = self.gesture else {
            return Ok(());
        };
        let id = gesture.overlay();
        let overlay = self.overlays.get(id).ok_or(SignError::UnknownOverlay(id))?;
        let content = viewport.to_content(pointer);

        match gesture {
            Gesture::Drag { grab, .. } => {
                let top_left = Point::new(content.x - grab.x, content.y - grab.y);
                let size = Size::new(overlay.width, overlay.height);
                let target = retarget(snapshot, top_left, size).ok_or(
                    SignError::GeometryUnavailable {
                        overlay: id,
                        page: overlay.page_index,
                    },
                )?;

                if target.page_index != overlay.page_index {
                    log::debug!(
                        "{} moved from page {} to page {}",
                        id,
                        overlay.page_index + 1,
                        target.page_index + 1
                    );
                }
                self.overlays.update(
                    id,
                    OverlayPatch::position(target.page_index, target.x, target.y),
                )?;
            }
            Gesture::Resize { handle, .. } => {
                let page = snapshot.page_geometry(overlay.page_index).ok_or(
                    SignError::GeometryUnavailable {
                        overlay: id,
                        page: overlay.page_index,
                    },
                )?;
                let local = page.to_page(content);
                let rect = LayoutRect::new(overlay.x, overlay.y, overlay.width, overlay.height);
                let resized = resize_rect(&rect, handle, local, self.config.min_overlay_size);
                self.overlays.update(
                    id,
                    OverlayPatch {
                        x: Some(resized.left),
                        y: Some(resized.top),
                        width: Some(resized.width),
                        height: Some(resized.height),
                        ..OverlayPatch::default()
                    },
                )?;
            }
        }
        Ok(())
    }
}
