use crate::editor::{BrushOptions, Stroke, ToolKind};
use crate::geometry::{DisplayPoint, DisplayViewport};

/// Pointer input as reported by the element the surface is rendered into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(DisplayPoint),
    Move(DisplayPoint),
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Leave,
}

impl PointerEvent {
    pub const fn kind(&self) -> PointerEventKind {
        match self {
            Self::Down(_) => PointerEventKind::Down,
            Self::Move(_) => PointerEventKind::Move,
            Self::Up => PointerEventKind::Up,
            Self::Leave => PointerEventKind::Leave,
        }
    }

    pub const fn position(&self) -> Option<DisplayPoint> {
        match self {
            Self::Down(point) | Self::Move(point) => Some(*point),
            Self::Up | Self::Leave => None,
        }
    }
}

/// Tool configuration and element size in effect when an event arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeContext {
    pub tool: ToolKind,
    pub brush: BrushOptions,
    pub viewport: DisplayViewport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrokeOutcome {
    Ignored,
    Started,
    Extended,
    Finished(Stroke),
}
