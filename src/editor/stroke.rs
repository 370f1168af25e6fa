use super::tools::{BrushOptions, ToolKind};
use crate::geometry::{BufferPoint, Color};

/// What a stroke does to the surface, fixed when the gesture starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeTool {
    Pen { color: Color },
    Eraser,
}

impl StrokeTool {
    pub const fn from_tool(tool: ToolKind, brush: BrushOptions) -> Option<Self> {
        match tool {
            ToolKind::Pen => Some(Self::Pen { color: brush.color }),
            ToolKind::Eraser => Some(Self::Eraser),
            ToolKind::None => None,
        }
    }
}

/// One press-to-release gesture in buffer space.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub tool: StrokeTool,
    pub width: u8,
    pub points: Vec<BufferPoint>,
    pub finalized: bool,
}

impl Stroke {
    pub fn new(tool: StrokeTool, width: u8, start: BufferPoint) -> Self {
        Self {
            tool,
            width,
            points: vec![start],
            finalized: false,
        }
    }

    pub fn last_point(&self) -> Option<BufferPoint> {
        self.points.last().copied()
    }

    pub fn append_point(&mut self, point: BufferPoint) {
        self.points.push(point);
    }

    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Consecutive point pairs, the unit of rasterization.
    pub fn segments(&self) -> impl Iterator<Item = (BufferPoint, BufferPoint)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Whether replaying this stroke changes any pixel.
    pub fn has_marks(&self) -> bool {
        self.segments().any(|(from, to)| from != to)
    }
}
