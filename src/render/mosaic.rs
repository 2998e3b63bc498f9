//! Block-average pixelation baked directly into a raster
//!
//! Baking discards the original pixels, so callers must keep the untouched
//! base image around if the effect ever needs to be undone.

use image::RgbaImage;

use crate::domain::Rect;

/// Pixels along each image edge that are never pixelated
pub const FRAME_MARGIN: i32 = 2;

/// Pixelate `rect` of `img` in place using `block_size` square blocks
///
/// The rectangle is clipped to the image minus [`FRAME_MARGIN`]. Trailing
/// blocks are shrunk to fit rather than skipped.
pub fn apply_mosaic(img: &mut RgbaImage, rect: Rect, block_size: u32) {
    let bounds = Rect::from_size(img.width(), img.height()).inset(FRAME_MARGIN);
    let rect = Rect::new(
        rect.left.min(rect.right),
        rect.top.min(rect.bottom),
        rect.left.max(rect.right),
        rect.top.max(rect.bottom),
    );
    let Some(area) = rect.intersect(bounds) else {
        log::debug!("Mosaic {:?} is outside the editable area, skipping", rect);
        return;
    };
    let block_size = i32::try_from(block_size.max(1)).unwrap_or(i32::MAX);

    let mut block_y = area.top;
    while block_y < area.bottom {
        let block_end_y = block_y.saturating_add(block_size).min(area.bottom);

        let mut block_x = area.left;
        while block_x < area.right {
            let block_end_x = block_x.saturating_add(block_size).min(area.right);
            let block = Rect::new(block_x, block_y, block_end_x, block_end_y);

            if let Some(avg_color) = block_average(img, block) {
                for py in block.top..block.bottom {
                    for px in block.left..block.right {
                        img.put_pixel(px as u32, py as u32, avg_color);
                    }
                }
            }

            block_x = block_end_x;
        }
        block_y = block_end_y;
    }
}

/// Truncating mean of every channel over `block`; `None` for an empty block
fn block_average(img: &RgbaImage, block: Rect) -> Option<image::Rgba<u8>> {
    let mut total_r: u64 = 0;
    let mut total_g: u64 = 0;
    let mut total_b: u64 = 0;
    let mut total_a: u64 = 0;
    let mut pixel_count: u64 = 0;

    for py in block.top..block.bottom {
        for px in block.left..block.right {
            let pixel = img.get_pixel(px as u32, py as u32);
            total_r += pixel[0] as u64;
            total_g += pixel[1] as u64;
            total_b += pixel[2] as u64;
            total_a += pixel[3] as u64;
            pixel_count += 1;
        }
    }

    if pixel_count == 0 {
        return None;
    }
    Some(image::Rgba([
        (total_r / pixel_count) as u8,
        (total_g / pixel_count) as u8,
        (total_b / pixel_count) as u8,
        (total_a / pixel_count) as u8,
    ]))
}
