//! Mask rasterization using tiny-skia
//!
//! Strokes are drawn onto a premultiplied `Pixmap` as translucent preview
//! lines; `finalize_mask` turns that surface into a crisp two-color mask.

use std::io;

use image::RgbaImage;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry::{mask, stroke};
use crate::domain::{MaskImage, Point};

fn stroke_paint() -> Paint<'static> {
    let [r, g, b, a] = stroke::COLOR;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Draw a single round dab, used for the first point of a stroke
pub fn draw_dot(pixmap: &mut Pixmap, at: Point) {
    let Some(path) = PathBuilder::from_circle(at.x, at.y, stroke::WIDTH / 2.0) else {
        return;
    };
    pixmap.fill_path(
        &path,
        &stroke_paint(),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

/// Draw one round-capped stroke segment
pub fn draw_segment(pixmap: &mut Pixmap, from: Point, to: Point) {
    if from == to {
        draw_dot(pixmap, to);
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = Stroke {
        width: stroke::WIDTH,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &stroke_paint(), &stroke, Transform::identity(), None);
}

/// Composite the stroke surface over opaque black and threshold every pixel
///
/// The output holds only `mask::SELECTED` and `mask::UNSELECTED` pixels.
pub fn binarize(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.data().chunks_exact(4)) {
        // Premultiplied source-over onto opaque black leaves the stored color channels as is
        let selected = src[0] > mask::THRESHOLD || src[1] > mask::THRESHOLD;
        dst.0 = if selected {
            mask::SELECTED
        } else {
            mask::UNSELECTED
        };
    }
    out
}

/// Produce the exportable mask for the current stroke surface
pub fn finalize_mask(pixmap: &Pixmap) -> anyhow::Result<MaskImage> {
    let raster = binarize(pixmap);
    let mut png = Vec::new();
    write_png(&mut png, &raster)?;
    Ok(MaskImage::new(raster, png))
}

pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
