//! In-process drawing surface.

use crate::selection::hit_test;
use crate::store::StrokeStore;
use crate::stroke::{Ink, Stroke, StrokePath};
use crate::surface::{DrawingSurface, SurfaceError};
use crate::tools::{ActiveTool, EraserKind};
use kurbo::{BezPath, Point, Rect, Shape, Size};

/// Default visible canvas size.
const DEFAULT_CANVAS_SIZE: Size = Size::new(834.0, 1121.0);

/// A lasso drawn on the surface, as a closed polygon in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Lasso {
    path: BezPath,
}

impl Lasso {
    /// Close the polygon through `points`. Returns `None` for fewer than three points.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let points: Vec<Point> = points.into_iter().collect();
        if points.len() < 3 {
            return None;
        }

        let mut path = BezPath::new();
        path.move_to(points[0]);
        for &point in &points[1..] {
            path.line_to(point);
        }
        path.close_path();
        Some(Self { path })
    }

    /// Whether the lasso encloses a stroke (any sampled point inside).
    pub fn encloses(&self, stroke: &Stroke) -> bool {
        stroke.world_points().any(|p| self.path.contains(p))
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }
}

/// The canvas: strokes, visible region, and the surface-side lasso selection.
#[derive(Debug, Clone)]
pub struct Canvas {
    store: StrokeStore,
    /// Visible canvas region, in canvas coordinates.
    pub bounds: Rect,
    lasso: Option<Lasso>,
    redraw_requests: u64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas of the default size.
    pub fn new() -> Self {
        Self::with_store(StrokeStore::new())
    }

    /// Create a canvas showing an existing drawing.
    pub fn with_store(store: StrokeStore) -> Self {
        Self {
            store,
            bounds: Rect::from_origin_size(Point::ZERO, DEFAULT_CANVAS_SIZE),
            lasso: None,
            redraw_requests: 0,
        }
    }

    /// Set the visible size.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.bounds = Rect::from_origin_size(self.bounds.origin(), Size::new(width, height));
    }

    /// Take the drawing back out of the canvas.
    pub fn into_store(self) -> StrokeStore {
        self.store
    }

    /// Pen input: append a stroke through `points` in the given ink.
    pub fn draw_stroke(&mut self, ink: Ink, points: impl IntoIterator<Item = Point>) {
        let path = StrokePath::from_locations(points, ink.width);
        if path.is_empty() {
            return;
        }
        self.store.append(Stroke::new(ink, path));
        self.request_redraw();
    }

    /// Vector eraser: remove the first stroke hit at `point`.
    pub fn erase_at(&mut self, point: Point) -> Option<Stroke> {
        let (_, index) = hit_test(&self.store, point)?;
        let removed = self.store.remove(index).ok()?;
        self.request_redraw();
        Some(removed)
    }

    /// Draw a lasso on the surface.
    pub fn set_lasso(&mut self, lasso: Option<Lasso>) {
        self.lasso = lasso;
        self.request_redraw();
    }

    /// Number of repaint requests received so far.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }
}

impl DrawingSurface for Canvas {
    fn store(&self) -> &StrokeStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut StrokeStore {
        &mut self.store
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }

    fn delete_selection(&mut self) -> Result<(), SurfaceError> {
        let Some(lasso) = &self.lasso else {
            return Ok(());
        };

        let kept: Vec<Stroke> = self
            .store
            .iter()
            .filter(|stroke| !lasso.encloses(stroke))
            .cloned()
            .collect();
        if kept.len() != self.store.len() {
            log::debug!("Lasso delete removed {} strokes", self.store.len() - kept.len());
            self.store.replace_all(kept);
            self.request_redraw();
        }
        Ok(())
    }

    fn apply_tool(&mut self, tool: &ActiveTool, points: &[Point]) -> Result<(), SurfaceError> {
        match tool {
            ActiveTool::Ink(ink) => self.draw_stroke(*ink, points.iter().copied()),
            ActiveTool::Eraser(EraserKind::Vector) => {
                for &point in points {
                    self.erase_at(point);
                }
            }
            ActiveTool::Eraser(EraserKind::Bitmap) => {
                return Err(SurfaceError::Unsupported("bitmap erasing"));
            }
            ActiveTool::Lasso => self.set_lasso(Lasso::from_points(points.iter().copied())),
        }
        Ok(())
    }
}
