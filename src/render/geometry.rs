//! Shared geometry calculations for annotation rendering and hit-testing

/// Arrow geometry constants
pub mod arrow {
    /// Arrowhead length in pixels
    pub const HEAD_SIZE: f32 = 15.0;
    /// Arrowhead half-angle from the shaft in radians (30 degrees)
    pub const HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
    /// Minimum arrow length for a head to be drawn
    pub const MIN_LENGTH: f32 = 5.0;

    /// Calculate the two base corners of the arrowhead triangle
    ///
    /// Returns `None` when the arrow is too short to carry a head.
    pub fn head_points(
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
        head_size: f32,
    ) -> Option<(f32, f32, f32, f32)> {
        let dx = end_x - start_x;
        let dy = end_y - start_y;
        let length = (dx * dx + dy * dy).sqrt();
        if length < MIN_LENGTH {
            return None;
        }

        // Unit direction vector (pointing from start to end)
        let nx = dx / length;
        let ny = dy / length;

        let cos_a = HEAD_ANGLE.cos();
        let sin_a = HEAD_ANGLE.sin();

        // Backwards direction rotated each way by the head angle
        let head1_dx = -nx * cos_a + ny * sin_a;
        let head1_dy = -nx * sin_a - ny * cos_a;
        let head2_dx = -nx * cos_a - ny * sin_a;
        let head2_dy = nx * sin_a - ny * cos_a;

        Some((
            end_x + head1_dx * head_size,
            end_y + head1_dy * head_size,
            end_x + head2_dx * head_size,
            end_y + head2_dy * head_size,
        ))
    }
}

/// Shape (rectangle/ellipse) geometry constants
pub mod shape {
    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;
    /// Side length of the square corner handle glyphs
    pub const HANDLE_GLYPH: f32 = 6.0;
}

/// Calculate ellipse center and radii from bounding box
#[inline]
pub fn ellipse_from_bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> (f32, f32, f32, f32) {
    let cx = (min_x + max_x) * 0.5;
    let cy = (min_y + max_y) * 0.5;
    let rx = ((max_x - min_x) * 0.5).max(1.0);
    let ry = ((max_y - min_y) * 0.5).max(1.0);
    (cx, cy, rx, ry)
}

/// Shortest distance from `(px, py)` to the segment `a`-`b`
pub fn distance_to_segment(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let cx = ax + t * dx;
    let cy = ay + t * dy;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}
