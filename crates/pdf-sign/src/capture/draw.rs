use super::CapturedImage;
use crate::constants::DRAW_PAD_SIZE;
use crate::types::*;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Free-hand drawing surface recording ink strokes in pad pixels
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPad {
    width: u32,
    height: u32,
    strokes: Vec<Vec<Point>>,
    in_stroke: bool,
}

impl Default for DrawPad {
    fn default() -> Self {
        Self::new(DRAW_PAD_SIZE.0, DRAW_PAD_SIZE.1)
    }
}

impl DrawPad {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
            in_stroke: false,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    pub fn begin_stroke(&mut self, at: Point) {
        self.strokes.push(vec![self.clamp(at)]);
        self.in_stroke = true;
    }

    /// Extend the current stroke; starts one if none is in progress
    pub fn extend_stroke(&mut self, to: Point) {
        if !self.in_stroke {
            self.begin_stroke(to);
            return;
        }
        let to = self.clamp(to);
        if let Some(stroke) = self.strokes.last_mut() {
            if stroke.last() != Some(&to) {
                stroke.push(to);
            }
        }
    }

    pub fn end_stroke(&mut self) {
        self.in_stroke = false;
    }

    /// Remove the most recent stroke
    pub fn undo(&mut self) {
        self.strokes.pop();
        self.in_stroke = false;
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.in_stroke = false;
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(|s| s.is_empty())
    }

    fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0.0, self.width as f32),
            p.y.clamp(0.0, self.height as f32),
        )
    }
}

/// Rasterise the pad's strokes to a transparent PNG the size of the pad
pub fn capture_drawing(pad: &DrawPad, stroke_width: f32, ink: [u8; 4]) -> Result<CapturedImage> {
    if pad.is_empty() {
        return Err(SignError::EmptyInput("no strokes were drawn"));
    }

    let mut pixmap = Pixmap::new(pad.width, pad.height)
        .ok_or_else(|| {
            SignError::Encode(format!("invalid pad size {}x{}", pad.width, pad.height))
        })?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(ink[0], ink[1], ink[2], ink[3]);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: stroke_width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for points in pad.strokes.iter().filter(|s| !s.is_empty()) {
        if points.len() == 1 {
            // A tap leaves a dot
            let p = points[0];
            if let Some(dot) = PathBuilder::from_circle(p.x, p.y, stroke_width / 2.0) {
                pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            continue;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(points[0].x, points[0].y);
        for p in &points[1..] {
            builder.line_to(p.x, p.y);
        }
        if let Some(path) = builder.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    let image = pixmap
        .encode_png()
        .map_err(|e| SignError::Encode(e.to_string()))?;

    log::debug!(
        "Captured drawing with {} strokes ({}x{})",
        pad.strokes.len(),
        pad.width,
        pad.height
    );

    Ok(CapturedImage {
        source: SignatureSource::Draw,
        image,
        format: RasterFormat::Png,
        width: pad.width,
        height: pad.height,
    })
}
