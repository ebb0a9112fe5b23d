//! Core application module
//!
//! This module contains:
//! - The studio that routes messages to the mask capture and edit session

pub mod app;

pub use app::{Studio, Task};
