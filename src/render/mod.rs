//! Mask rendering module
//!
//! This module contains:
//! - Constants shared between the live stroke preview and the exported mask
//! - Stroke rasterization and mask binarization using tiny-skia

pub mod geometry;
pub mod image;
