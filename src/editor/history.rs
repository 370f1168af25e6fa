use image::RgbaImage;

use super::raster;
use super::stroke::Stroke;
use super::surface::DrawingSurface;
use crate::error::EditorResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Undo,
    Redo,
}

impl HistoryAction {
    pub const fn applied_message(self) -> &'static str {
        match self {
            Self::Undo => "undo applied",
            Self::Redo => "redo applied",
        }
    }

    pub const fn empty_message(self) -> &'static str {
        match self {
            Self::Undo => "undo stack empty",
            Self::Redo => "redo stack empty",
        }
    }
}

/// Ordered log of finished strokes. The surface can be rebuilt from it at any point.
#[derive(Debug, Clone, Default)]
pub struct StrokeHistory {
    applied: Vec<Stroke>,
    undone: Vec<Stroke>,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.applied
    }

    pub fn can_undo(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Records a stroke that has already been rasterized. Drops the redo branch.
    pub fn record(&mut self, stroke: Stroke) {
        self.applied.push(stroke);
        self.undone.clear();
    }

    pub fn clear(&mut self) {
        self.applied.clear();
        self.undone.clear();
    }

    /// Moves one stroke between the applied and undone stacks.
    ///
    /// Returns `false` when the source stack is empty.
    pub fn step(&mut self, action: HistoryAction) -> bool {
        let (source, target) = match action {
            HistoryAction::Undo => (&mut self.applied, &mut self.undone),
            HistoryAction::Redo => (&mut self.undone, &mut self.applied),
        };
        match source.pop() {
            Some(stroke) => {
                target.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Resets `surface` to its seeded state and replays every applied stroke.
    pub fn rebuild(&self, surface: &mut DrawingSurface, base: &RgbaImage) -> EditorResult<()> {
        surface.clear(base)?;
        for stroke in &self.applied {
            raster::draw_stroke(surface, stroke);
        }
        Ok(())
    }
}
