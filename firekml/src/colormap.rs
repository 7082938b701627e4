//! The `jet` colormap.

use image::Rgba;
use wrfout::C;

/// Piecewise linear `(x, y)` control points of one channel.
type Segments = &'static [(C, C)];

const RED: Segments = &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const GREEN: Segments = &[
    (0.0, 0.0),
    (0.125, 0.0),
    (0.375, 1.0),
    (0.64, 1.0),
    (0.91, 0.0),
    (1.0, 0.0),
];
const BLUE: Segments = &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

/// Returns the opaque `jet` color at `t`, clamped to `[0, 1]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn jet(t: C) -> Rgba<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let channel = |segments: Segments| (interpolate(segments, t) * 255.0).round() as u8;
    Rgba([channel(RED), channel(GREEN), channel(BLUE), u8::MAX])
}

fn interpolate(segments: Segments, t: C) -> C {
    for pair in segments.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if t <= x1 {
            return y0 + (y1 - y0) * (t - x0) / (x1 - x0);
        }
    }
    segments.last().map_or(0.0, |(_, y)| *y)
}
