//! Mask capture module
//!
//! This module provides:
//! - The stroke buffer that accumulates freehand input
//! - MaskCapture, which maps pointer input and exports binary masks
//! - The draggable control panel shown while in mask mode
//! - Stroke script replay for the command line

pub mod buffer;
pub mod capture;
pub mod panel;
pub mod script;

pub use buffer::StrokeBuffer;
pub use capture::{MaskCapture, MaskChange};
pub use panel::ControlPanel;
pub use script::StrokeScript;
