//! Message types for the editing studio
//!
//! This module contains:
//! - Msg enum with nested sub-enums for organized message handling
//! - Pointer events shared by the mask canvas and the floating panel

use crate::config::{AspectRatio, Resolution};
use crate::domain::{ImageLayout, NodeId, Point, Rect, SourceImage};
use crate::generation::{GenerationError, GenerationResponse};

use super::state::RequestTicket;

// ============================================================================
// Pointer Types
// ============================================================================

/// Pointer input in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(Point),
    Moved(Point),
    Released(Point),
    /// Pointer left the surface; ends any stroke or drag in progress
    Left,
}

// ============================================================================
// Sub-message Types
// ============================================================================

/// Source image lifecycle
#[derive(Debug, Clone)]
pub enum SourceMsg {
    /// A new image passed upload intake
    Selected(SourceImage),
    /// Start over with no image
    Reset,
    /// Edit this result
    Promote(NodeId),
}

/// Mask drawing mode
#[derive(Debug, Clone)]
pub enum MaskMsg {
    /// Open the drawing overlay
    Enter,
    /// Close the overlay keeping the mask
    Done,
    /// Close the overlay discarding the mask
    Cancel,
    /// Erase all strokes
    Clear,
    /// Displayed image size or position changed
    Layout(ImageLayout),
    /// Pointer input on the drawing surface
    Canvas(PointerEvent),
}

/// Prompt submissions
///
/// Unset options fall back to the configured defaults.
#[derive(Debug, Clone)]
pub enum SubmitMsg {
    /// Edit the current source
    Edit {
        prompt: String,
        resolution: Option<Resolution>,
    },
    /// Generate from text alone
    Generate {
        prompt: String,
        resolution: Option<Resolution>,
        aspect_ratio: Option<AspectRatio>,
    },
}

// ============================================================================
// Main Message Enum
// ============================================================================

#[derive(Debug, Clone)]
pub enum Msg {
    Source(SourceMsg),
    SelectHistory(NodeId),
    Mask(MaskMsg),
    /// Pressed on the panel's drag handle
    PanelDragStart {
        pointer: Point,
        panel: Rect,
        container: Rect,
    },
    /// Pointer input anywhere in the window, used while the panel is dragged
    WindowPointer {
        event: PointerEvent,
        container: Rect,
    },
    Submit(SubmitMsg),
    /// Generator finished the request identified by the ticket
    Generated(RequestTicket, Result<GenerationResponse, GenerationError>),
    /// Network reachability changed
    Connectivity(bool),
}

impl Msg {
    pub fn canvas(event: PointerEvent) -> Self {
        Msg::Mask(MaskMsg::Canvas(event))
    }
}
