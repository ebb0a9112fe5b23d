//! Mask-constrained image editing core: freehand mask capture, an edit
//! session with result history, and the message-driven studio that ties
//! them to a generative backend.

pub mod config;
pub mod core;
pub mod domain;
pub mod generation;
pub mod mask;
pub mod render;
pub mod session;
pub mod upload;
