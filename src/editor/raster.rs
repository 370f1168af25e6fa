use super::stroke::{Stroke, StrokeTool};
use super::surface::DrawingSurface;
use crate::geometry::BufferPoint;

/// Rasterizes the segment `from -> to` as a round-capped capsule of `width`.
///
/// A pixel is covered when the distance from its center to the segment is at
/// most `width / 2`. Capsules of consecutive segments overlap at the shared
/// point, which yields round joins. Zero-length segments draw nothing.
pub fn draw_segment(
    surface: &mut DrawingSurface,
    tool: StrokeTool,
    width: u8,
    from: BufferPoint,
    to: BufferPoint,
) {
    if from == to || !from.is_finite() || !to.is_finite() {
        return;
    }
    let bounds = surface.bounds();
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }

    let (dx, dy) = (to.x - from.x, to.y - from.y);
    if !(dx * dx + dy * dy).is_finite() {
        return;
    }

    let radius = f32::from(width.max(1)) / 2.0;
    let Some((left, top, right, bottom)) = pixel_span(from, to, radius, bounds.width, bounds.height)
    else {
        return;
    };

    for y in top..=bottom {
        for x in left..=right {
            let center = BufferPoint::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(center, from, to) > radius {
                continue;
            }
            match tool {
                StrokeTool::Pen { color } => surface.paint_pixel(x, y, color),
                StrokeTool::Eraser => surface.erase_pixel(x, y),
            }
        }
    }
}

/// Replays every segment of `stroke` onto `surface`.
pub fn draw_stroke(surface: &mut DrawingSurface, stroke: &Stroke) {
    for (from, to) in stroke.segments() {
        draw_segment(surface, stroke.tool, stroke.width, from, to);
    }
}

fn pixel_span(
    from: BufferPoint,
    to: BufferPoint,
    radius: f32,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    let min_x = (from.x.min(to.x) - radius).floor();
    let max_x = (from.x.max(to.x) + radius).ceil();
    let min_y = (from.y.min(to.y) - radius).floor();
    let max_y = (from.y.max(to.y) + radius).ceil();

    let max_col = (width - 1) as f32;
    let max_row = (height - 1) as f32;
    if max_x < 0.0 || max_y < 0.0 || min_x > max_col || min_y > max_row {
        return None;
    }

    Some((
        min_x.clamp(0.0, max_col) as u32,
        min_y.clamp(0.0, max_row) as u32,
        max_x.clamp(0.0, max_col) as u32,
        max_y.clamp(0.0, max_row) as u32,
    ))
}

fn distance_to_segment(point: BufferPoint, from: BufferPoint, to: BufferPoint) -> f32 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq > 0.0 {
        (((point.x - from.x) * dx + (point.y - from.y) * dy) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let nearest_x = from.x + t * dx;
    let nearest_y = from.y + t * dy;
    ((point.x - nearest_x).powi(2) + (point.y - nearest_y).powi(2)).sqrt()
}
