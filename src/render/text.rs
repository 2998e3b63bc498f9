//! Text measurement and glyph rasterization
//!
//! The editor never talks to a font library directly; it goes through
//! [`TextEngine`] so hosts (and tests) can pick how text is measured and drawn.

use std::path::Path;

use ab_glyph::{Font as _, FontArc, PxScale, ScaleFont as _};
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::config::{FontSpec, ShapeColor};
use crate::domain::Point;
use crate::error::Result;

/// Font metrics and drawing used by rendering, hit-testing and the caret
pub trait TextEngine {
    /// Distance between two baselines
    fn line_height(&self, font: &FontSpec) -> f32;

    /// Horizontal advance of `text` on a single line
    fn text_width(&self, font: &FontSpec, text: &str) -> f32;

    /// Draw `text` with its baseline starting at `origin`
    fn draw(
        &self,
        pixmap: &mut Pixmap,
        font: &FontSpec,
        bold: bool,
        origin: Point,
        text: &str,
        color: ShapeColor,
    );
}

/// Metrics-only engine with fixed per-character advances; draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedAdvanceText;

impl FixedAdvanceText {
    const NARROW: f32 = 0.6;
    const LINE: f32 = 1.2;

    fn is_wide(ch: char) -> bool {
        // Hangul Jamo onwards covers CJK, kana and fullwidth forms
        ch as u32 >= 0x1100
    }
}

impl TextEngine for FixedAdvanceText {
    fn line_height(&self, font: &FontSpec) -> f32 {
        font.size * Self::LINE
    }

    fn text_width(&self, font: &FontSpec, text: &str) -> f32 {
        text.chars()
            .map(|ch| {
                if Self::is_wide(ch) {
                    font.size
                } else {
                    font.size * Self::NARROW
                }
            })
            .sum()
    }

    fn draw(&self, _: &mut Pixmap, _: &FontSpec, _: bool, _: Point, _: &str, _: ShapeColor) {}
}

/// Engine backed by a real outline font
#[derive(Clone)]
pub struct GlyphTextEngine {
    font: FontArc,
}

impl GlyphTextEngine {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            font: FontArc::try_from_vec(data)?,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        log::debug!("Loaded font {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(data)
    }

    fn draw_run(
        &self,
        pixmap: &mut Pixmap,
        font: &FontSpec,
        (x, y): (f32, f32),
        text: &str,
        color: ShapeColor,
    ) {
        let scale = PxScale::from(font.size);
        let scaled = self.font.as_scaled(scale);
        let mut caret = x;
        let mut prev = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev_id) = prev {
                caret += scaled.kern(prev_id, id);
            }
            let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, y));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                blend_pixel(pixmap, px, py, color, coverage);
            });
        }
    }
}

impl TextEngine for GlyphTextEngine {
    fn line_height(&self, font: &FontSpec) -> f32 {
        self.font.as_scaled(PxScale::from(font.size)).height()
    }

    fn text_width(&self, font: &FontSpec, text: &str) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(font.size));
        let mut width = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev_id) = prev {
                width += scaled.kern(prev_id, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn draw(
        &self,
        pixmap: &mut Pixmap,
        font: &FontSpec,
        bold: bool,
        origin: Point,
        text: &str,
        color: ShapeColor,
    ) {
        let (x, y) = (origin.x as f32, origin.y as f32);
        self.draw_run(pixmap, font, (x, y), text, color);
        if bold {
            self.draw_run(pixmap, font, (x + 1.0, y), text, color);
        }
    }
}

/// Source-over blend of `color` at `coverage` into one pixmap pixel
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: ShapeColor, coverage: f32) {
    let (w, h) = (pixmap.width() as i32, pixmap.height() as i32);
    if x < 0 || y < 0 || x >= w || y >= h {
        return;
    }
    let idx = (y * w + x) as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[idx];

    let alpha = coverage.clamp(0.0, 1.0) * f32::from(color.a) / 255.0;
    let mix = |src: u8, dst: u8| {
        (f32::from(src) * alpha + f32::from(dst) * (1.0 - alpha)).round() as u8
    };

    if let Some(out) = PremultipliedColorU8::from_rgba(
        mix(color.r, dst.red()),
        mix(color.g, dst.green()),
        mix(color.b, dst.blue()),
        mix(255, dst.alpha()),
    ) {
        pixels[idx] = out;
    }
}
