//! Pure domain types with minimal dependencies
//!
//! This module contains the value types shared by mask capture and the
//! edit session. Nothing here knows about rendering or the generator.

pub mod geometry;
pub mod history;
pub mod media;

pub use geometry::*;
pub use history::*;
pub use media::*;
