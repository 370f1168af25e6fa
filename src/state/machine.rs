use super::event::{PointerEvent, PointerEventKind, StrokeContext, StrokeOutcome};
use super::StrokeState;
use crate::editor::{raster, DrawingSurface, Stroke, StrokeTool, ToolKind};
use crate::geometry::BufferPoint;

/// Turns pointer events into strokes on a drawing surface.
///
/// Segments are rasterized as each move arrives. Tool, color and width are
/// captured on press and hold for the whole gesture.
#[derive(Debug, Default)]
pub struct StrokeEngine {
    state: StrokeState,
    active: Option<Stroke>,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    pub fn can_transition(&self, event: PointerEventKind, tool: ToolKind) -> bool {
        self.next_state(event, tool).is_some()
    }

    pub fn next_state(&self, event: PointerEventKind, tool: ToolKind) -> Option<StrokeState> {
        use PointerEventKind::*;
        match (self.state, event) {
            (StrokeState::Idle, Down) if tool.draws() => Some(StrokeState::Tracking),
            (StrokeState::Tracking, Move) => Some(StrokeState::Tracking),
            (StrokeState::Tracking, Up | Leave) => Some(StrokeState::Idle),
            _ => None,
        }
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        context: StrokeContext,
        surface: &mut DrawingSurface,
    ) -> StrokeOutcome {
        if self.next_state(event.kind(), context.tool).is_none() {
            return StrokeOutcome::Ignored;
        }

        match event {
            PointerEvent::Down(position) => {
                let Some(start) = context.viewport.to_buffer(position, surface.bounds()) else {
                    tracing::debug!(?position, "pointer down outside a measurable viewport");
                    return StrokeOutcome::Ignored;
                };
                let Some(tool) = StrokeTool::from_tool(context.tool, context.brush) else {
                    return StrokeOutcome::Ignored;
                };
                tracing::debug!(?tool, width = context.brush.size, "stroke started");
                self.active = Some(Stroke::new(tool, context.brush.size, start));
                self.state = StrokeState::Tracking;
                StrokeOutcome::Started
            }
            PointerEvent::Move(position) => {
                let Some(point) = context.viewport.to_buffer(position, surface.bounds()) else {
                    return StrokeOutcome::Ignored;
                };
                self.extend(point, surface)
            }
            PointerEvent::Up | PointerEvent::Leave => self.finish(),
        }
    }

    fn extend(&mut self, point: BufferPoint, surface: &mut DrawingSurface) -> StrokeOutcome {
        let Some(stroke) = self.active.as_mut() else {
            self.state = StrokeState::Idle;
            return StrokeOutcome::Ignored;
        };
        if let Some(previous) = stroke.last_point() {
            raster::draw_segment(surface, stroke.tool, stroke.width, previous, point);
        }
        stroke.append_point(point);
        StrokeOutcome::Extended
    }

    fn finish(&mut self) -> StrokeOutcome {
        self.state = StrokeState::Idle;
        match self.active.take() {
            Some(mut stroke) => {
                stroke.finalize();
                tracing::debug!(points = stroke.points.len(), "stroke finished");
                StrokeOutcome::Finished(stroke)
            }
            None => StrokeOutcome::Ignored,
        }
    }

    /// Drops any gesture in progress without recording it.
    pub fn reset(&mut self) {
        self.state = StrokeState::Idle;
        self.active = None;
    }
}

impl std::fmt::Display for StrokeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StrokeState::{:?}", self.state)
    }
}
