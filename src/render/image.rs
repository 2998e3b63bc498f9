//! Raster rendering for annotations using tiny-skia
//!
//! These functions draw onto an `RgbaImage` (or an already-open `Pixmap`)
//! for both the live display frame and the finished image.

use image::RgbaImage;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

use super::geometry::{self, arrow, shape};
use super::text::TextEngine;
use crate::config::{FontSpec, ShapeColor};
use crate::domain::{Outline, Point, Rect, Shape, TextShape};

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
pub fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

fn solid_paint(color: ShapeColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn outline_stroke(width: f32) -> Stroke {
    Stroke {
        width: width.max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn build_rect_path(bounds: Rect) -> Option<tiny_skia::Path> {
    let (min_x, min_y) = (bounds.left as f32, bounds.top as f32);
    let (max_x, max_y) = (bounds.right as f32, bounds.bottom as f32);

    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    pb.finish()
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<tiny_skia::Path> {
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);

    // Top to right
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);

    // Right to bottom
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);

    // Bottom to left
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);

    // Left to top
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

fn draw_rectangle(pixmap: &mut Pixmap, o: &Outline) {
    let bounds = o.bounds();
    if bounds.width() == 0 && bounds.height() == 0 {
        return;
    }
    if let Some(path) = build_rect_path(bounds) {
        let stroke = outline_stroke(o.stroke_width);
        pixmap.stroke_path(&path, &solid_paint(o.color), &stroke, Transform::identity(), None);
    }
}

fn draw_ellipse(pixmap: &mut Pixmap, o: &Outline) {
    let b = o.bounds();
    if b.width() == 0 && b.height() == 0 {
        return;
    }
    let (cx, cy, rx, ry) = geometry::ellipse_from_bounds(
        b.left as f32,
        b.top as f32,
        b.right as f32,
        b.bottom as f32,
    );
    if let Some(path) = build_ellipse_path(cx, cy, rx, ry) {
        let stroke = outline_stroke(o.stroke_width);
        pixmap.stroke_path(&path, &solid_paint(o.color), &stroke, Transform::identity(), None);
    }
}

/// Shaft line plus a filled triangular head at `end`
fn draw_arrow(pixmap: &mut Pixmap, o: &Outline) {
    if o.start == o.end {
        return;
    }
    let (sx, sy) = (o.start.x as f32, o.start.y as f32);
    let (ex, ey) = (o.end.x as f32, o.end.y as f32);
    let paint = solid_paint(o.color);
    let stroke = outline_stroke(o.stroke_width);

    let head = arrow::head_points(sx, sy, ex, ey, arrow::HEAD_SIZE);

    // Stop the shaft at the head base so the round cap cannot poke past the tip
    let (shaft_x, shaft_y) = match head {
        Some((h1x, h1y, h2x, h2y)) => ((h1x + h2x) * 0.5, (h1y + h2y) * 0.5),
        None => (ex, ey),
    };
    let mut pb = PathBuilder::new();
    pb.move_to(sx, sy);
    pb.line_to(shaft_x, shaft_y);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    if let Some((h1x, h1y, h2x, h2y)) = head {
        let mut pb = PathBuilder::new();
        pb.move_to(ex, ey);
        pb.line_to(h1x, h1y);
        pb.line_to(h2x, h2y);
        pb.close();
        if let Some(path) = pb.finish() {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

fn draw_text(pixmap: &mut Pixmap, t: &TextShape, text: &dyn TextEngine) {
    if t.string.is_empty() {
        return;
    }
    text.draw(pixmap, &t.font, t.bold, t.anchor, &t.string, t.color);
}

/// Draw a single shape; mosaics are already baked into the raster
pub fn render_shape(pixmap: &mut Pixmap, shape: &Shape, text: &dyn TextEngine) {
    match shape {
        Shape::Rectangle(o) => draw_rectangle(pixmap, o),
        Shape::Ellipse(o) => draw_ellipse(pixmap, o),
        Shape::Arrow(o) => draw_arrow(pixmap, o),
        Shape::Text(t) => draw_text(pixmap, t, text),
        Shape::Mosaic(_) => {}
    }
}

/// Draw shapes in document order onto an image
pub fn render_shapes<'a>(
    img: &mut RgbaImage,
    shapes: impl IntoIterator<Item = &'a Shape>,
    text: &dyn TextEngine,
) {
    with_pixmap(img, |pixmap| {
        for shape in shapes {
            render_shape(pixmap, shape, text);
        }
    });
}

/// Small filled squares on the four corners of `bounds`
pub fn draw_handles(pixmap: &mut Pixmap, bounds: Rect, color: ShapeColor) {
    let paint = solid_paint(color);
    let half = shape::HANDLE_GLYPH / 2.0;
    for (_, corner) in bounds.corners() {
        if let Some(rect) = tiny_skia::Rect::from_xywh(
            corner.x as f32 - half,
            corner.y as f32 - half,
            shape::HANDLE_GLYPH,
            shape::HANDLE_GLYPH,
        ) {
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}

/// Dashed outline marking a mosaic region while it is being dragged
pub fn draw_mosaic_preview(pixmap: &mut Pixmap, bounds: Rect) {
    let Some(path) = build_rect_path(bounds) else {
        return;
    };
    let mut paint = solid_paint(ShapeColor::rgb(255, 255, 255));
    paint.anti_alias = false;
    let stroke = Stroke {
        width: 1.0,
        dash: StrokeDash::new(vec![4.0, 4.0], 0.0),
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// Text being typed: committed part, preedit preview and caret
pub struct CompositionView<'a> {
    pub anchor: Point,
    pub committed: &'a str,
    pub preedit: &'a str,
    pub font: &'a FontSpec,
    pub bold: bool,
    pub color: ShapeColor,
    pub caret_visible: bool,
}

pub fn draw_composition(pixmap: &mut Pixmap, view: &CompositionView<'_>, text: &dyn TextEngine) {
    let anchor = view.anchor;
    text.draw(pixmap, view.font, view.bold, anchor, view.committed, view.color);

    let committed_width = text.text_width(view.font, view.committed);
    if !view.preedit.is_empty() {
        let origin = Point::new(anchor.x + committed_width.round() as i32, anchor.y);
        text.draw(
            pixmap,
            view.font,
            view.bold,
            origin,
            view.preedit,
            ShapeColor::PREEDIT,
        );
    }

    if view.caret_visible {
        let x = anchor.x as f32 + committed_width + text.text_width(view.font, view.preedit);
        let height = text.line_height(view.font);
        let mut pb = PathBuilder::new();
        pb.move_to(x, anchor.y as f32 - height + 2.0);
        pb.line_to(x, anchor.y as f32 + 2.0);
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: 1.0,
                ..Default::default()
            };
            pixmap.stroke_path(
                &path,
                &solid_paint(view.color),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MosaicShape;
    use crate::render::text::FixedAdvanceText;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn outline(start: (i32, i32), end: (i32, i32)) -> Outline {
        Outline {
            start: Point::new(start.0, start.1),
            end: Point::new(end.0, end.1),
            color: ShapeColor::rgb(255, 0, 0),
            stroke_width: 2.0,
        }
    }

    #[test]
    fn test_rectangle_draws_border_only() {
        let mut img = RgbaImage::from_pixel(40, 40, WHITE);
        render_shapes(
            &mut img,
            &[Shape::Rectangle(outline((10, 10), (30, 30)))],
            &FixedAdvanceText,
        );
        assert_ne!(*img.get_pixel(10, 20), WHITE);
        assert_eq!(*img.get_pixel(20, 20), WHITE);
        assert_eq!(*img.get_pixel(2, 2), WHITE);
    }

    #[test]
    fn test_arrow_head_is_filled() {
        let mut img = RgbaImage::from_pixel(60, 40, WHITE);
        render_shapes(
            &mut img,
            &[Shape::Arrow(outline((5, 20), (50, 20)))],
            &FixedAdvanceText,
        );
        // Inside the head triangle, off the shaft line
        assert_ne!(*img.get_pixel(42, 22), WHITE);
        assert_ne!(*img.get_pixel(20, 20), WHITE);
    }

    #[test]
    fn test_degenerate_shapes_draw_nothing() {
        let mut img = RgbaImage::from_pixel(20, 20, WHITE);
        let before = img.clone();
        render_shapes(
            &mut img,
            &[
                Shape::Arrow(outline((5, 5), (5, 5))),
                Shape::Rectangle(outline((8, 8), (8, 8))),
                Shape::Mosaic(MosaicShape {
                    start: Point::new(0, 0),
                    end: Point::new(20, 20),
                    block_size: 4,
                }),
            ],
            &FixedAdvanceText,
        );
        assert_eq!(img, before);
    }

    #[test]
    fn test_handles_on_corners() {
        let mut img = RgbaImage::from_pixel(40, 40, WHITE);
        with_pixmap(&mut img, |pixmap| {
            draw_handles(pixmap, Rect::new(10, 10, 30, 30), ShapeColor::rgb(0, 0, 255));
        });
        assert_eq!(*img.get_pixel(30, 30), Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(10, 10), Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(20, 20), WHITE);
    }
}
