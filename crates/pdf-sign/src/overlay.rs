//! Overlay store
//!
//! The authoritative list of placed signatures. The store enforces only the
//! data invariants (unique ids, rotation in `[0, 360)`, a single active
//! overlay); page and position legality is the interaction layer's job.

use crate::types::*;
use std::time::{Duration, Instant};

/// Partial update of an overlay; `None` fields are left untouched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlayPatch {
    pub page_index: Option<usize>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation_degrees: Option<f32>,
    pub state: Option<OverlayState>,
}

impl OverlayPatch {
    pub fn position(page_index: usize, x: f32, y: f32) -> Self {
        Self {
            page_index: Some(page_index),
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation_degrees: Some(degrees),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    overlay: Overlay,
    placed_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayStore {
    entries: Vec<Entry>,
    active: Option<OverlayId>,
    next_id: u64,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new overlay for `signature`; it starts pending reveal
    pub fn create(
        &mut self,
        signature: SignatureId,
        page_index: usize,
        at: Point,
        size: Size,
        now: Instant,
    ) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;

        self.entries.push(Entry {
            overlay: Overlay {
                id,
                signature,
                page_index,
                x: at.x,
                y: at.y,
                width: size.width,
                height: size.height,
                rotation_degrees: 0.0,
                state: OverlayState::PendingReveal,
            },
            placed_at: now,
        });
        id
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.entries
            .iter()
            .find(|e| e.overlay.id == id)
            .map(|e| &e.overlay)
    }

    pub fn update(&mut self, id: OverlayId, patch: OverlayPatch) -> Result<&Overlay> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.overlay.id == id)
            .ok_or(SignError::UnknownOverlay(id))?;
        let overlay = &mut entry.overlay;

        if let Some(page_index) = patch.page_index {
            overlay.page_index = page_index;
        }
        if let Some(x) = patch.x {
            overlay.x = x;
        }
        if let Some(y) = patch.y {
            overlay.y = y;
        }
        if let Some(width) = patch.width {
            overlay.width = width;
        }
        if let Some(height) = patch.height {
            overlay.height = height;
        }
        if let Some(degrees) = patch.rotation_degrees {
            overlay.rotation_degrees = normalize_degrees(degrees);
        }
        if let Some(state) = patch.state {
            overlay.state = state;
        }

        Ok(overlay)
    }

    /// Remove an overlay, deselecting it if it was active
    pub fn remove(&mut self, id: OverlayId) -> Option<Overlay> {
        let index = self.entries.iter().position(|e| e.overlay.id == id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        Some(self.entries.remove(index).overlay)
    }

    /// Select an overlay, or clear the selection with `None`. Unknown ids
    /// clear the selection.
    pub fn set_active(&mut self, id: Option<OverlayId>) {
        self.active = id.filter(|id| self.get(*id).is_some());
    }

    pub fn active(&self) -> Option<OverlayId> {
        self.active
    }

    /// Overlays in placement order (later entries are drawn on top)
    pub fn list(&self) -> impl DoubleEndedIterator<Item = &Overlay> {
        self.entries.iter().map(|e| &e.overlay)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every overlay and deselect
    pub fn clear(&mut self) {
        self.entries.clear();
        self.active = None;
    }

    /// Reveal overlays whose settle delay has elapsed. Returns how many
    /// changed state.
    pub fn reveal_settled(&mut self, now: Instant, delay: Duration) -> usize {
        let mut revealed = 0;
        for entry in &mut self.entries {
            if entry.overlay.state == OverlayState::PendingReveal
                && now.saturating_duration_since(entry.placed_at) >= delay
            {
                entry.overlay.state = OverlayState::Visible;
                revealed += 1;
            }
        }
        revealed
    }

    /// Whether any overlay is still waiting to be revealed
    pub fn has_pending(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.overlay.state == OverlayState::PendingReveal)
    }
}
