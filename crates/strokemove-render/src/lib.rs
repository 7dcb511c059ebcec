//! StrokeMove Render Library
//!
//! Turns an [`ExportPlan`](strokemove_core::ExportPlan) into pixels.
//! The default implementation rasterizes on the CPU into an RGBA buffer.

mod raster;
mod renderer;

pub use raster::{ExportedImage, MAX_EXPORT_DIMENSION, RasterRenderer, RasterTarget};
pub use renderer::{ExportOptions, RenderResult, RendererError, StrokeRenderer, paint_plan};
