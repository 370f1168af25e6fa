//! Drawing layer model: surface, tools, strokes and their rasterization.

mod document;
pub mod history;
pub mod raster;
mod stroke;
mod surface;
pub mod tools;

pub use document::Document;
pub use history::{HistoryAction, StrokeHistory};
pub use stroke::{Stroke, StrokeTool};
pub use surface::DrawingSurface;
pub use tools::{BrushOptions, ToolKind};
