//! Export planning: which strokes to paint, over what region, on what background.

use crate::store::StrokeStore;
use crate::stroke::SerializableColor;
use kurbo::Rect;

/// Margin added around a selection export, in canvas units.
pub const EXPORT_MARGIN: f64 = 20.0;

/// Background an export is composited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportBackground {
    Opaque(SerializableColor),
    Transparent,
}

/// What an export collaborator should rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    /// Region of the canvas the image covers.
    pub bounds: Rect,
    pub background: ExportBackground,
    /// Store indices to paint, in store order.
    pub strokes: Vec<usize>,
}

impl ExportPlan {
    /// True when this plan covers the whole canvas rather than a selection.
    pub fn is_whole_canvas(&self) -> bool {
        self.background == ExportBackground::Transparent
    }
}

/// Plan an export of `selected` strokes, or of the whole canvas when `selected` is empty.
///
/// A selection export covers the union of the selected render bounds plus
/// [`EXPORT_MARGIN`] on every side, on white. A whole-canvas export covers
/// `canvas_bounds` and keeps transparency.
pub fn plan_export(store: &StrokeStore, selected: &[usize], canvas_bounds: Rect) -> ExportPlan {
    let mut indices: Vec<usize> = selected
        .iter()
        .copied()
        .filter(|&index| {
            let in_range = index < store.count();
            debug_assert!(in_range, "export index {} out of range ({})", index, store.count());
            if !in_range {
                log::warn!("Skipping export index {} (store holds {})", index, store.count());
            }
            in_range
        })
        .collect();
    indices.sort_unstable();
    indices.dedup();

    let union = indices
        .iter()
        .filter_map(|&index| store.get(index).ok())
        .map(|stroke| stroke.render_bounds())
        .reduce(|acc, bounds| acc.union(bounds));

    match union {
        Some(bounds) => ExportPlan {
            bounds: bounds.inflate(EXPORT_MARGIN, EXPORT_MARGIN),
            background: ExportBackground::Opaque(SerializableColor::white()),
            strokes: indices,
        },
        None => ExportPlan {
            bounds: canvas_bounds,
            background: ExportBackground::Transparent,
            strokes: (0..store.count()).collect(),
        },
    }
}
