//! Edge-triggered auto-scroll while dragging
//!
//! The scroll loop is driven one frame at a time by the host's repaint
//! cycle. Each frame re-evaluates the last pointer position, so the loop ends
//! on the first frame after the pointer leaves the hot zone.

use crate::config::SessionConfig;
use crate::types::*;

/// The visible window onto the scrollable page column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen position of the viewport's top-left corner
    pub left: f32,
    pub top: f32,
    pub height: f32,
    /// How far the content is scrolled down
    pub scroll_offset: f32,
    pub content_height: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, height: f32, content_height: f32) -> Self {
        Self {
            left,
            top,
            height,
            scroll_offset: 0.0,
            content_height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.height).max(0.0)
    }

    /// Map a screen-space pointer into content space
    pub fn to_content(&self, screen: Point) -> Point {
        Point::new(
            screen.x - self.left,
            screen.y - self.top + self.scroll_offset,
        )
    }

    /// Scroll by `delta`, clamped to the content. Returns the distance moved.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        let before = self.scroll_offset;
        self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, self.max_scroll());
        self.scroll_offset - before
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScrollState {
    Idle,
    Running { pointer_y: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutoScroll {
    hot_zone_fraction: f32,
    max_speed: f32,
    state: ScrollState,
}

impl AutoScroll {
    pub fn new(hot_zone_fraction: f32, max_speed: f32) -> Self {
        Self {
            hot_zone_fraction,
            max_speed,
            state: ScrollState::Idle,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.hot_zone_fraction, config.max_scroll_speed)
    }

    /// Scroll speed in pixels per frame for a pointer at screen `pointer_y`.
    ///
    /// Zero outside the hot zones; ramps linearly to the maximum at the
    /// viewport edge. Negative values scroll up.
    pub fn speed_for(&self, pointer_y: f32, viewport: &Viewport) -> f32 {
        let zone = viewport.height * self.hot_zone_fraction;
        if zone <= 0.0 {
            return 0.0;
        }

        let from_top = pointer_y - viewport.top;
        let from_bottom = viewport.bottom() - pointer_y;

        if from_top < zone {
            let depth = ((zone - from_top) / zone).clamp(0.0, 1.0);
            -self.max_speed * depth
        } else if from_bottom < zone {
            let depth = ((zone - from_bottom) / zone).clamp(0.0, 1.0);
            self.max_speed * depth
        } else {
            0.0
        }
    }

    /// Record the pointer during a drag. Arms the loop inside a hot zone and
    /// disarms it outside. Returns whether the loop is running.
    pub fn update_pointer(&mut self, pointer_y: f32, viewport: &Viewport) -> bool {
        if self.speed_for(pointer_y, viewport) != 0.0 {
            if !self.is_running() {
                log::debug!("Auto-scroll started at y={}", pointer_y);
            }
            self.state = ScrollState::Running { pointer_y };
        } else {
            self.state = ScrollState::Idle;
        }
        self.is_running()
    }

    /// Advance one frame. Returns `true` if another frame should be
    /// scheduled; the loop stops itself once the pointer is outside the hot
    /// zone or the content cannot scroll further.
    pub fn frame(&mut self, viewport: &mut Viewport) -> bool {
        let ScrollState::Running { pointer_y } = self.state else {
            return false;
        };

        let speed = self.speed_for(pointer_y, viewport);
        if speed == 0.0 || viewport.scroll_by(speed) == 0.0 {
            self.state = ScrollState::Idle;
            return false;
        }
        true
    }

    /// Stop the loop (drag ended, surface closed)
    pub fn cancel(&mut self) {
        self.state = ScrollState::Idle;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ScrollState::Running { .. })
    }
}
