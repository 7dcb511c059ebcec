//! StrokeMove Core Library
//!
//! Stroke storage, hit-testing, drag-to-move and lasso resolution for a
//! handwriting canvas. Platform-agnostic: the drawing surface is reached
//! through the [`DrawingSurface`] trait.

pub mod canvas;
pub mod editor;
pub mod export;
pub mod input;
pub mod lasso;
pub mod note;
pub mod selection;
pub mod storage;
pub mod store;
pub mod stroke;
pub mod surface;
pub mod tools;

pub use canvas::{Canvas, Lasso};
pub use editor::{GestureOutcome, StrokeEditor};
pub use export::{EXPORT_MARGIN, ExportBackground, ExportPlan, plan_export};
pub use input::{Gesture, PanPhase, PenEvent};
pub use lasso::{LassoResolution, resolve_lasso};
pub use note::Note;
pub use selection::{Selection, SelectionTracker, TapOutcome, hit_test};
pub use store::{StoreError, StoreSnapshot, StrokeStore};
pub use stroke::{
    DEFAULT_INK_WIDTH, Ink, InkKind, SerializableColor, Stroke, StrokePath, StrokePoint,
};
pub use surface::{DrawingSurface, SurfaceError};
pub use tools::{ActiveTool, EditMode, EraserKind, ToolConfig, ToolManager};
