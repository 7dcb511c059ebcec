//! Renderer trait abstraction.

use kurbo::Affine;
use strokemove_core::export::{ExportBackground, ExportPlan};
use strokemove_core::store::StrokeStore;
use strokemove_core::stroke::Stroke;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Nothing to export: {width}x{height} pixels")]
    EmptyExport { width: u32, height: u32 },
    #[error("Export of {width}x{height} pixels exceeds the {max} pixel limit")]
    TooLarge { width: u64, height: u64, max: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Resolution multiplier (1 = 1x, 2 = 2x, 3 = 3x).
    pub scale: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl ExportOptions {
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// Drawing backend for export.
///
/// Implementations can rasterize on the CPU, build a GPU scene, or emit vectors.
pub trait StrokeRenderer {
    /// Fill the whole target with the plan's background.
    fn fill_background(&mut self, background: ExportBackground);

    /// Paint one stroke. `view` maps canvas coordinates to target coordinates; the
    /// stroke's own transform is applied on top of it.
    fn render_stroke(&mut self, stroke: &Stroke, view: Affine);
}

/// Drive `renderer` through `plan`: background first, then strokes in store order.
pub fn paint_plan<R: StrokeRenderer + ?Sized>(
    renderer: &mut R,
    store: &StrokeStore,
    plan: &ExportPlan,
    view: Affine,
) {
    renderer.fill_background(plan.background);
    for &index in &plan.strokes {
        match store.get(index) {
            Ok(stroke) => renderer.render_stroke(stroke, view),
            Err(e) => log::warn!("Skipping stroke in export: {}", e),
        }
    }
}
