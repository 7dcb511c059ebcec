//! The drawing surface capability the engine operates on.

use crate::store::StrokeStore;
use crate::tools::ActiveTool;
use kurbo::Point;
use thiserror::Error;

/// Errors reported by a drawing surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Delete-selection probe failed: {0}")]
    ProbeFailed(String),
    #[error("Surface does not support {0}")]
    Unsupported(&'static str),
}

/// A drawing surface, handed to each engine operation that needs it.
///
/// The engine never keeps a surface around between calls. Whatever the surface renders
/// must equal [`store`](Self::store) at all times.
pub trait DrawingSurface {
    /// The strokes currently drawn.
    fn store(&self) -> &StrokeStore;

    /// Mutable access for whole-sequence replacement and restore.
    fn store_mut(&mut self) -> &mut StrokeStore;

    /// Ask the surface to repaint (selection highlight changed, strokes replaced).
    fn request_redraw(&mut self);

    /// Destructively delete whatever the surface's own region selection marks as
    /// selected, compacting the remaining strokes.
    fn delete_selection(&mut self) -> Result<(), SurfaceError>;

    /// Apply a finished pen gesture with the surface's own tool (ink, eraser, lasso).
    fn apply_tool(&mut self, tool: &ActiveTool, points: &[Point]) -> Result<(), SurfaceError>;
}
