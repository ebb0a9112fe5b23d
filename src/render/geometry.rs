//! Shared constants for mask strokes and the floating control panel
//!
//! Kept in one place so the live preview and the exported mask agree.

/// Freehand mask stroke constants
pub mod stroke {
    /// Stroke width in buffer pixels
    pub const WIDTH: f32 = 20.0;
    /// Preview color (translucent yellow), straight RGBA
    pub const COLOR: [u8; 4] = [255, 255, 0, 128];
}

/// Mask binarization constants
pub mod mask {
    /// A composited pixel is part of the mask if its red or green channel exceeds this
    pub const THRESHOLD: u8 = 100;
    pub const SELECTED: [u8; 4] = [255, 255, 255, 255];
    pub const UNSELECTED: [u8; 4] = [0, 0, 0, 255];
}

/// Floating control panel constants
pub mod panel {
    /// Approximate panel width used when clamping to the container
    pub const APPROX_WIDTH: f32 = 40.0;
    /// Approximate panel height used when clamping to the container
    pub const APPROX_HEIGHT: f32 = 20.0;
}
