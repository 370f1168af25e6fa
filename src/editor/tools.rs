use crate::geometry::Color;

pub const BRUSH_SIZE_MIN: u8 = 1;
pub const BRUSH_SIZE_MAX: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    None,
    Pen,
    Eraser,
}

impl ToolKind {
    pub const fn draws(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushOptions {
    pub color: Color,
    pub size: u8,
}

impl Default for BrushOptions {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 3,
        }
    }
}

impl BrushOptions {
    pub fn new(color: Color, size: u8) -> Self {
        let mut options = Self { color, size };
        options.set_size(size);
        options
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_size(&mut self, size: u8) {
        self.size = size.clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX);
    }
}
