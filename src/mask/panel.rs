//! Floating mask control panel that can be dragged inside the image container

use crate::domain::{Point, Rect};
use crate::render::geometry::panel;

/// Pointer capture that only exists while a drag is in progress
#[derive(Clone, Copy, Debug, PartialEq)]
struct DragCapture {
    /// Pointer offset from the panel's top-left corner when the drag started
    offset: Point,
}

/// Position state for the mask control panel
///
/// `position` is `None` while the panel sits in its default docked spot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlPanel {
    position: Option<Point>,
    capture: Option<DragCapture>,
}

impl ControlPanel {
    /// Explicit top-left offset inside the container, `None` when docked
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Whether pointer events must currently be routed to the panel
    pub fn is_dragging(&self) -> bool {
        self.capture.is_some()
    }

    /// Begin dragging; `panel` and `container` are the current rendered bounds
    pub fn drag_start(&mut self, pointer: Point, panel: Rect, container: Rect) {
        let offset = panel.relative(pointer);
        // Seed from the docked position so the first move does not jump
        if self.position.is_none() {
            self.position = Some(container.relative(panel.origin()));
        }
        self.capture = Some(DragCapture { offset });
        log::debug!("Panel drag started, offset {:?}", offset);
    }

    /// Move the panel under the pointer, clamped inside the container
    ///
    /// Returns false if no drag is in progress.
    pub fn drag_move(&mut self, pointer: Point, container: Rect) -> bool {
        let Some(capture) = self.capture else {
            return false;
        };

        let max_x = container.width - panel::APPROX_WIDTH;
        let max_y = container.height - panel::APPROX_HEIGHT;
        let x = pointer.x - container.x - capture.offset.x;
        let y = pointer.y - container.y - capture.offset.y;

        self.position = Some(Point::new(x.min(max_x).max(0.0), y.min(max_y).max(0.0)));
        true
    }

    /// Release the pointer capture
    pub fn drag_end(&mut self) {
        self.capture = None;
    }

    /// Return to the docked position and drop any capture
    pub fn reset(&mut self) {
        self.position = None;
        self.capture = None;
    }
}
