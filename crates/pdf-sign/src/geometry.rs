//! Page geometry snapshots
//!
//! Rendered pages are stacked in a vertical column. Each page occupies an
//! outer layout box spanning the column width, with its rendered bitmap
//! centred horizontally inside it. All rectangles are layout pixels in the
//! coordinate space of the scroll content (independent of scroll offset).

use crate::config::LayoutOptions;
use crate::document::NativePageSize;
use crate::types::*;

/// Geometry of one page in both layout pixels and native points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_index: usize,
    /// Outer box of the page, including any centring padding
    pub layout_rect: LayoutRect,
    /// The rendered surface inside `layout_rect`
    pub bitmap_rect: LayoutRect,
    pub native_width: f32,
    pub native_height: f32,
}

impl PageGeometry {
    /// Offset of the rendered bitmap from the outer box origin
    pub fn bitmap_offset(&self) -> Point {
        Point::new(
            self.bitmap_rect.left - self.layout_rect.left,
            self.bitmap_rect.top - self.layout_rect.top,
        )
    }

    /// Convert a content-space point into this page's coordinates
    pub fn to_page(&self, content: Point) -> Point {
        Point::new(
            content.x - self.layout_rect.left,
            content.y - self.layout_rect.top,
        )
    }

    /// Convert a page-relative point into content space
    pub fn to_content(&self, local: Point) -> Point {
        Point::new(
            local.x + self.layout_rect.left,
            local.y + self.layout_rect.top,
        )
    }

    fn vertical_distance(&self, y: f32) -> f32 {
        if y < self.layout_rect.top {
            self.layout_rect.top - y
        } else if y >= self.layout_rect.bottom() {
            y - self.layout_rect.bottom()
        } else {
            0.0
        }
    }
}

/// Source of immutable page geometry, independent of the rendering backend
pub trait PageGeometryProvider {
    fn page_count(&self) -> usize;

    fn page_geometry(&self, page_index: usize) -> Option<PageGeometry>;
}

/// Geometry of every page of a rendered document at one moment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSnapshot {
    pages: Vec<PageGeometry>,
    content_height: f32,
}

impl LayoutSnapshot {
    /// Build a snapshot from measured page geometry.
    ///
    /// Pages are re-indexed in the order given.
    pub fn from_pages(pages: Vec<PageGeometry>) -> Self {
        let pages: Vec<PageGeometry> = pages
            .into_iter()
            .enumerate()
            .map(|(page_index, geometry)| PageGeometry {
                page_index,
                ..geometry
            })
            .collect();
        let content_height = pages
            .iter()
            .map(|p| p.layout_rect.bottom())
            .fold(0.0, f32::max);
        Self {
            pages,
            content_height,
        }
    }

    pub fn pages(&self) -> &[PageGeometry] {
        &self.pages
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Page whose vertical span contains `content_y`
    pub fn page_at_y(&self, content_y: f32) -> Option<usize> {
        self.pages
            .iter()
            .find(|p| content_y >= p.layout_rect.top && content_y < p.layout_rect.bottom())
            .map(|p| p.page_index)
    }

    /// Page containing `content_y`, or the closest one when it falls in a gap
    /// between pages or beyond the first or last page
    pub fn nearest_page(&self, content_y: f32) -> Option<usize> {
        self.page_at_y(content_y).or_else(|| {
            self.pages
                .iter()
                .min_by(|a, b| {
                    a.vertical_distance(content_y)
                        .total_cmp(&b.vertical_distance(content_y))
                })
                .map(|p| p.page_index)
        })
    }
}

impl PageGeometryProvider for LayoutSnapshot {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_geometry(&self, page_index: usize) -> Option<PageGeometry> {
        self.pages.get(page_index).copied()
    }
}

/// Stacks rendered pages into a column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub container_width: f32,
    pub page_gap: f32,
    pub top_padding: f32,
}

impl PageLayout {
    pub fn new(container_width: f32, options: &LayoutOptions) -> Self {
        Self {
            container_width,
            page_gap: options.page_gap,
            top_padding: options.top_padding,
        }
    }

    /// Arrange pages given their native sizes and the layout-pixel size their
    /// bitmaps are displayed at
    pub fn arrange(&self, pages: &[(NativePageSize, Size)]) -> LayoutSnapshot {
        let mut top = self.top_padding;
        let mut geometries = Vec::with_capacity(pages.len());

        for (page_index, (native, bitmap)) in pages.iter().enumerate() {
            let outer_width = self.container_width.max(bitmap.width);
            let layout_rect = LayoutRect::new(0.0, top, outer_width, bitmap.height);
            let bitmap_rect = LayoutRect::new(
                (outer_width - bitmap.width) / 2.0,
                top,
                bitmap.width,
                bitmap.height,
            );

            geometries.push(PageGeometry {
                page_index,
                layout_rect,
                bitmap_rect,
                native_width: native.width,
                native_height: native.height,
            });

            top += bitmap.height + self.page_gap;
        }

        LayoutSnapshot::from_pages(geometries)
    }
}

/// Bitmap size of a page rasterised to `render_width` pixels, keeping its
/// aspect ratio
pub fn bitmap_size_for_width(native: &NativePageSize, render_width: u32) -> Size {
    let width = render_width as f32;
    let height = (width * native.height / native.width).round();
    Size::new(width, height)
}
