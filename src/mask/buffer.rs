use tiny_skia::Pixmap;

use crate::domain::{MaskImage, PixelSize, Point};
use crate::render::image::{draw_dot, draw_segment, finalize_mask};

/// Raster surface that accumulates freehand strokes at display resolution
pub struct StrokeBuffer {
    pixmap: Pixmap,
    size: PixelSize,
    last: Option<Point>,
}

impl StrokeBuffer {
    /// Allocate an empty, fully transparent buffer
    pub fn new(size: PixelSize) -> Option<Self> {
        let pixmap = Pixmap::new(size.width(), size.height())?;
        log::debug!("Stroke buffer allocated: {}x{}", size.width(), size.height());
        Some(Self {
            pixmap,
            size,
            last: None,
        })
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Start a stroke at `at` (buffer coordinates)
    pub fn begin(&mut self, at: Point) {
        draw_dot(&mut self.pixmap, at);
        self.last = Some(at);
    }

    /// Continue the current stroke to `to`; ignored if no stroke is in progress
    pub fn extend(&mut self, to: Point) {
        let Some(from) = self.last else {
            return;
        };
        draw_segment(&mut self.pixmap, from, to);
        self.last = Some(to);
    }

    /// Finish the current stroke, returns whether one was in progress
    pub fn end(&mut self) -> bool {
        self.last.take().is_some()
    }

    pub fn is_drawing(&self) -> bool {
        self.last.is_some()
    }

    /// Erase every stroke
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.last = None;
    }

    /// Whether nothing has been drawn since allocation or the last clear
    pub fn is_empty(&self) -> bool {
        self.pixmap.data().iter().all(|&b| b == 0)
    }

    /// Live preview surface (premultiplied RGBA)
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Binarize the current strokes into an exportable mask
    pub fn finalize(&self) -> anyhow::Result<MaskImage> {
        finalize_mask(&self.pixmap)
    }
}

impl std::fmt::Debug for StrokeBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeBuffer")
            .field("size", &self.size)
            .field("drawing", &self.last.is_some())
            .finish()
    }
}
