//! Replay of recorded stroke input, used by the `mask` command

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{ImageLayout, MaskImage, Point, Rect};

use super::capture::MaskCapture;

/// A recorded set of freehand strokes in view coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeScript {
    /// Rendered bounds of the image element; defaults to the display size at the origin
    #[serde(default)]
    pub view: Option<Rect>,
    pub strokes: Vec<Vec<Point>>,
}

impl StrokeScript {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stroke script: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid stroke script: {}", path.display()))
    }

    /// Draw every stroke over an image displayed at `width` x `height` and return the mask
    pub fn render(&self, width: u32, height: u32) -> Result<MaskImage> {
        let mut layout = ImageLayout::unscaled(width, height);
        if let Some(view) = self.view {
            layout.bounds = view;
        }

        let mut capture = MaskCapture::default();
        capture.set_layout(layout);
        capture.enter_mask_mode();

        for stroke in &self.strokes {
            let Some((first, rest)) = stroke.split_first() else {
                continue;
            };
            capture.stroke_begin(*first);
            for p in rest {
                capture.stroke_extend(*p);
            }
            capture.stroke_end();
        }

        capture
            .finalize_mask()
            .with_context(|| format!("Cannot build a {width}x{height} mask"))
    }
}
