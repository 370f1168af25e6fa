pub mod event;
pub mod machine;
pub mod model;

pub use event::{PointerEvent, PointerEventKind, StrokeContext, StrokeOutcome};
pub use machine::StrokeEngine;
pub use model::StrokeState;
