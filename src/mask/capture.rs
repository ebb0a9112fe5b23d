//! Mask capture: freehand strokes over the displayed image, exported as a binary mask

use crate::domain::{ImageLayout, MaskImage, Point, view_to_buffer};

use super::buffer::StrokeBuffer;
use super::panel::ControlPanel;

/// Change to the exported mask that the owner must apply
#[derive(Clone, Debug, PartialEq)]
pub enum MaskChange {
    /// A stroke completed; this is the refreshed mask
    Updated(MaskImage),
    /// The mask was erased
    Cleared,
}

/// Interactive mask drawing state
///
/// The stroke buffer only exists in mask mode and only once the displayed
/// image has a usable layout. Until then every stroke operation is a no-op.
#[derive(Debug, Default)]
pub struct MaskCapture {
    active: bool,
    layout: Option<ImageLayout>,
    buffer: Option<StrokeBuffer>,
    panel: ControlPanel,
}

impl MaskCapture {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a stroke is currently being drawn
    pub fn is_drawing(&self) -> bool {
        self.buffer.as_ref().is_some_and(StrokeBuffer::is_drawing)
    }

    pub fn buffer(&self) -> Option<&StrokeBuffer> {
        self.buffer.as_ref()
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ControlPanel {
        &mut self.panel
    }

    /// Enter mask mode with a fresh, empty buffer sized to the displayed image
    pub fn enter_mask_mode(&mut self) {
        self.active = true;
        self.allocate();
    }

    /// Leave mask mode; without `commit` the mask is cleared as well
    pub fn exit_mask_mode(&mut self, commit: bool) -> Option<MaskChange> {
        self.active = false;
        self.panel.reset();
        let change = if commit {
            None
        } else {
            Some(self.clear_mask())
        };
        self.buffer = None;
        change
    }

    /// Record the displayed image's layout
    ///
    /// A buffer that could not be sized earlier is allocated now. An existing
    /// buffer keeps its resolution; later pointer positions are mapped through
    /// the new bounds.
    pub fn set_layout(&mut self, layout: ImageLayout) {
        self.layout = Some(layout);
        if self.active && self.buffer.is_none() {
            self.allocate();
        }
    }

    /// The source image changed; its layout is unknown until reported again
    pub fn source_changed(&mut self, layout: Option<ImageLayout>) {
        self.layout = layout;
        self.buffer = None;
        if self.active {
            self.allocate();
        }
    }

    pub fn stroke_begin(&mut self, pos: Point) {
        if !self.active {
            return;
        }
        let Some(at) = self.to_buffer(pos) else {
            return;
        };
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.begin(at);
        }
    }

    pub fn stroke_extend(&mut self, pos: Point) {
        let Some(at) = self.to_buffer(pos) else {
            return;
        };
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.extend(at);
        }
    }

    /// Finish the current stroke and refresh the exported mask
    pub fn stroke_end(&mut self) -> Option<MaskChange> {
        let buffer = self.buffer.as_mut()?;
        if !buffer.end() {
            return None;
        }
        self.finalize_mask().map(MaskChange::Updated)
    }

    /// Erase all strokes
    pub fn clear_mask(&mut self) -> MaskChange {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.clear();
        }
        MaskChange::Cleared
    }

    /// Binarize the current buffer, `None` if there is no buffer
    pub fn finalize_mask(&self) -> Option<MaskImage> {
        let buffer = self.buffer.as_ref()?;
        match buffer.finalize() {
            Ok(mask) => Some(mask),
            Err(err) => {
                log::error!("Failed to encode mask: {:?}", err);
                None
            }
        }
    }

    fn allocate(&mut self) {
        self.buffer = self
            .layout
            .and_then(|layout| layout.display_size())
            .and_then(StrokeBuffer::new);
        if self.buffer.is_none() {
            log::debug!("Mask mode waiting for image layout");
        }
    }

    fn to_buffer(&self, pos: Point) -> Option<Point> {
        let layout = self.layout?;
        let size = self.buffer.as_ref()?.size();
        view_to_buffer(pos, layout.bounds, size)
    }
}
