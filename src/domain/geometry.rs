//! Geometric types for view and buffer coordinates

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A point in either view (pointer) or buffer (pixel) coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Bounding box of a rendered element in view coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Position of `p` relative to this rectangle's top-left corner
    pub fn relative(&self, p: Point) -> Point {
        Point::new(p.x - self.x, p.y - self.y)
    }
}

/// Non-zero pixel dimensions of a raster surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelSize {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl PixelSize {
    /// Returns `None` when either side is zero, i.e. the element is not laid out yet
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width.get()
    }

    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

/// Layout of the displayed source image as reported by the front end
///
/// `display_width` x `display_height` is the intrinsic on-screen size in whole pixels and
/// becomes the stroke buffer resolution. `bounds` is where the element is
/// actually rendered, which may be scaled by layout independently.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageLayout {
    pub display_width: u32,
    pub display_height: u32,
    pub bounds: Rect,
}

impl ImageLayout {
    /// Layout where the element is rendered at exactly its display size
    pub fn unscaled(display_width: u32, display_height: u32) -> Self {
        Self {
            display_width,
            display_height,
            bounds: Rect::new(0.0, 0.0, display_width as f32, display_height as f32),
        }
    }

    pub fn display_size(&self) -> Option<PixelSize> {
        PixelSize::new(self.display_width, self.display_height)
    }
}

/// Map a pointer position in view coordinates onto a buffer of `size` pixels
/// rendered inside `bounds`
///
/// Returns `None` if the rendered element has collapsed to zero size.
pub fn view_to_buffer(p: Point, bounds: Rect, size: PixelSize) -> Option<Point> {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return None;
    }
    let scale_x = size.width() as f32 / bounds.width;
    let scale_y = size.height() as f32 / bounds.height;
    Some(Point::new(
        (p.x - bounds.x) * scale_x,
        (p.y - bounds.y) * scale_y,
    ))
}
