use crate::constants::*;
use crate::types::*;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Styling of typed signatures
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TypedStyle {
    /// Font families tried in order after the generic cursive family
    pub font_families: Vec<String>,
    pub font_px: f32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub padding_px: f32,
    /// Ink colour as RGBA
    pub color: [u8; 4],
}

impl Default for TypedStyle {
    fn default() -> Self {
        Self {
            font_families: vec![
                "Dancing Script".to_string(),
                "Great Vibes".to_string(),
                "URW Chancery L".to_string(),
                "Z003".to_string(),
            ],
            font_px: TYPED_FONT_PX,
            canvas_width: TYPED_CANVAS.0,
            canvas_height: TYPED_CANVAS.1,
            padding_px: TYPED_PADDING_PX,
            color: [0, 0, 0, 255],
        }
    }
}

/// Layout of the stacked page column
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Width pages are rasterised to, in pixels
    pub render_width: u32,
    pub page_gap: f32,
    pub top_padding: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            page_gap: PAGE_GAP,
            top_padding: LAYOUT_TOP_PADDING,
        }
    }
}

/// Tunables of a signing session
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    // Placement
    pub draw_size: Size,
    pub type_size: Size,
    pub upload_size: Size,
    pub default_page: usize,
    pub default_position: (f32, f32),
    pub reveal_settle_ms: u64,

    // Manipulation
    pub rotate_step_degrees: f32,
    pub min_overlay_size: f32,

    // Auto-scroll
    pub hot_zone_fraction: f32,
    pub max_scroll_speed: f32,

    // Capture
    pub typed: TypedStyle,
    pub draw_stroke_width: f32,

    // Surface
    pub layout: LayoutOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            draw_size: DRAW_DEFAULT_SIZE,
            type_size: TYPE_DEFAULT_SIZE,
            upload_size: UPLOAD_DEFAULT_SIZE,
            default_page: 0,
            default_position: DEFAULT_PLACEMENT,
            reveal_settle_ms: REVEAL_SETTLE_MS,
            rotate_step_degrees: ROTATE_STEP_DEGREES,
            min_overlay_size: MIN_OVERLAY_SIZE,
            hot_zone_fraction: HOT_ZONE_FRACTION,
            max_scroll_speed: MAX_SCROLL_SPEED,
            typed: TypedStyle::default(),
            draw_stroke_width: DRAW_STROKE_WIDTH,
            layout: LayoutOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| SignError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SignError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_settle_ms)
    }

    /// Initial placement size for a capture mode
    pub fn default_size(&self, source: SignatureSource) -> Size {
        match source {
            SignatureSource::Draw => self.draw_size,
            SignatureSource::Type => self.type_size,
            SignatureSource::Upload => self.upload_size,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let (default_x, default_y) = self.default_position;
        for (name, value) in [
            ("draw width", self.draw_size.width),
            ("draw height", self.draw_size.height),
            ("type width", self.type_size.width),
            ("type height", self.type_size.height),
            ("upload width", self.upload_size.width),
            ("upload height", self.upload_size.height),
            ("default x", default_x),
            ("default y", default_y),
            ("rotate step", self.rotate_step_degrees),
            ("minimum overlay size", self.min_overlay_size),
            ("hot zone fraction", self.hot_zone_fraction),
            ("maximum scroll speed", self.max_scroll_speed),
            ("draw stroke width", self.draw_stroke_width),
            ("typed font size", self.typed.font_px),
            ("typed padding", self.typed.padding_px),
            ("page gap", self.layout.page_gap),
            ("top padding", self.layout.top_padding),
        ] {
            if !value.is_finite() {
                return Err(SignError::Config(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        if self.min_overlay_size <= 0.0 {
            return Err(SignError::Config(
                "Minimum overlay size must be positive".to_string(),
            ));
        }

        for (name, size) in [
            ("draw", self.draw_size),
            ("type", self.type_size),
            ("upload", self.upload_size),
        ] {
            if size.width < self.min_overlay_size || size.height < self.min_overlay_size {
                return Err(SignError::Config(format!(
                    "Default {} size {}x{} is below the minimum overlay size {}",
                    name, size.width, size.height, self.min_overlay_size
                )));
            }
        }

        if self.draw_stroke_width <= 0.0 {
            return Err(SignError::Config(
                "Draw stroke width must be positive".to_string(),
            ));
        }

        if !(self.hot_zone_fraction > 0.0 && self.hot_zone_fraction < 0.5) {
            return Err(SignError::Config(format!(
                "Hot zone fraction must be between 0 and 0.5, got {}",
                self.hot_zone_fraction
            )));
        }

        if self.max_scroll_speed <= 0.0 {
            return Err(SignError::Config(
                "Maximum scroll speed must be positive".to_string(),
            ));
        }

        if self.rotate_step_degrees <= 0.0 || self.rotate_step_degrees >= 360.0 {
            return Err(SignError::Config(format!(
                "Rotate step must be within (0, 360), got {}",
                self.rotate_step_degrees
            )));
        }

        if self.typed.font_px <= 0.0
            || self.typed.canvas_width == 0
            || self.typed.canvas_height == 0
        {
            return Err(SignError::Config(
                "Typed signature canvas and font size must be positive".to_string(),
            ));
        }

        if self.layout.render_width == 0 {
            return Err(SignError::Config(
                "Render width must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
