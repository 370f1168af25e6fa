/// Shared coordinate and color primitives used across the editor modules.

/// A point in buffer space: pixel coordinates against the image's natural resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferPoint {
    pub x: f32,
    pub y: f32,
}

impl BufferPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in display space, relative to the top-left corner of the rendered element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

impl DisplayPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen size of the element the surface is rendered into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayViewport {
    pub width: f32,
    pub height: f32,
}

impl DisplayViewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Rescales `point` into the buffer space of `bounds`, each axis independently.
    ///
    /// Returns `None` while the element has no measurable size, or when the
    /// scaled point overflows.
    pub fn to_buffer(&self, point: DisplayPoint, bounds: ImageBounds) -> Option<BufferPoint> {
        if !self.is_measurable() || !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let scale_x = bounds.width as f32 / self.width;
        let scale_y = bounds.height as f32 / self.height;
        let mapped = BufferPoint::new(point.x * scale_x, point.y * scale_y);
        mapped.is_finite().then_some(mapped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    pub width: u32,
    pub height: u32,
}

impl ImageBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_size_viewport_doubles_coordinates() {
        let viewport = DisplayViewport::new(200.0, 150.0);
        let point = viewport
            .to_buffer(DisplayPoint::new(10.0, 20.0), ImageBounds::new(400, 300))
            .expect("viewport should be measurable");
        assert_eq!(point, BufferPoint::new(20.0, 40.0));
    }

    #[test]
    fn axes_scale_independently_for_letterboxed_elements() {
        let viewport = DisplayViewport::new(400.0, 100.0);
        let point = viewport
            .to_buffer(DisplayPoint::new(100.0, 50.0), ImageBounds::new(400, 300))
            .expect("viewport should be measurable");
        assert_eq!(point, BufferPoint::new(100.0, 150.0));
    }

    #[test]
    fn unmeasured_viewport_maps_nothing() {
        let bounds = ImageBounds::new(10, 10);
        assert!(DisplayViewport::new(0.0, 10.0)
            .to_buffer(DisplayPoint::new(1.0, 1.0), bounds)
            .is_none());
        assert!(DisplayViewport::new(10.0, f32::NAN)
            .to_buffer(DisplayPoint::new(1.0, 1.0), bounds)
            .is_none());
    }

    #[test]
    fn overflowing_scale_maps_nothing() {
        let tiny = DisplayViewport::new(0.5, 0.4);
        let huge = DisplayPoint::new(f32::MAX / 2.0, f32::MAX / 2.0);
        assert!(tiny.to_buffer(huge, ImageBounds::new(100, 80)).is_none());
    }

    #[test]
    fn hex_colors_round_trip_through_parser() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::new(255, 128, 0)));
        assert_eq!(Color::from_hex("0A0b0C"), Some(Color::new(10, 11, 12)));
        assert_eq!(Color::new(1, 2, 255).to_hex(), "#0102ff");
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }
}
