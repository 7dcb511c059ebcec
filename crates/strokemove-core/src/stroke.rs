//! Ink stroke records.
//!
//! A [`Stroke`] is an immutable value. Changing a stroke means building a new value
//! (usually through [`Stroke::with_transform`]) and putting it back into the store at
//! the same index. Path and mask geometry sit behind `Arc`, so copies are cheap.

use kurbo::{Affine, BezPath, Point, Rect, Shape};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default nib width for new ink.
pub const DEFAULT_INK_WIDTH: f64 = 3.0;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Kind of inking tool a stroke was drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InkKind {
    #[default]
    Pen,
    Pencil,
    Marker,
    FountainPen,
    Monoline,
}

/// Ink appearance of a stroke. The engine never looks inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ink {
    pub kind: InkKind,
    pub color: SerializableColor,
    /// Nominal nib width used for newly sampled points.
    pub width: f64,
}

impl Ink {
    pub fn new(kind: InkKind, color: SerializableColor, width: f64) -> Self {
        Self { kind, color, width }
    }
}

impl Default for Ink {
    fn default() -> Self {
        Self::new(InkKind::Pen, SerializableColor::black(), DEFAULT_INK_WIDTH)
    }
}

/// One sampled point of a stroke path, in stroke-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub location: Point,
    /// Rendered diameter at this sample.
    pub size: f64,
    #[serde(default = "default_pressure")]
    pub pressure: f64,
}

fn default_pressure() -> f64 {
    1.0
}

impl StrokePoint {
    pub fn new(location: Point, size: f64) -> Self {
        Self {
            location,
            size,
            pressure: 1.0,
        }
    }
}

/// Sampled geometry of a stroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokePath {
    points: Vec<StrokePoint>,
}

impl StrokePath {
    pub fn new(points: Vec<StrokePoint>) -> Self {
        Self { points }
    }

    /// Build a path from bare locations, all sampled at the same size.
    pub fn from_locations(locations: impl IntoIterator<Item = Point>, size: f64) -> Self {
        Self {
            points: locations
                .into_iter()
                .map(|location| StrokePoint::new(location, size))
                .collect(),
        }
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Local bounding box, each sample inflated by half its size.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.points {
            let radius = point.size.max(0.0) / 2.0;
            min_x = min_x.min(point.location.x - radius);
            min_y = min_y.min(point.location.y - radius);
            max_x = max_x.max(point.location.x + radius);
            max_y = max_y.max(point.location.y + radius);
        }

        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Polyline through the sample locations.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();

        let Some(first) = self.points.first() else {
            return path;
        };

        path.move_to(first.location);
        for point in self.points.iter().skip(1) {
            path.line_to(point.location);
        }

        path
    }
}

/// One recorded ink gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub ink: Ink,
    path: Arc<StrokePath>,
    pub transform: Affine,
    mask: Option<Arc<BezPath>>,
}

impl Stroke {
    /// Create a stroke with an identity transform and no mask.
    pub fn new(ink: Ink, path: StrokePath) -> Self {
        Self {
            ink,
            path: Arc::new(path),
            transform: Affine::IDENTITY,
            mask: None,
        }
    }

    /// Same stroke, clipped to `mask` (stroke-local coordinates).
    pub fn with_mask(mut self, mask: BezPath) -> Self {
        self.mask = Some(Arc::new(mask));
        self
    }

    /// A new stroke value sharing ink, path and mask, with a different transform.
    pub fn with_transform(&self, transform: Affine) -> Self {
        Self {
            ink: self.ink,
            path: Arc::clone(&self.path),
            transform,
            mask: self.mask.clone(),
        }
    }

    pub fn path(&self) -> &StrokePath {
        &self.path
    }

    pub fn mask(&self) -> Option<&BezPath> {
        self.mask.as_deref()
    }

    /// Axis-aligned box enclosing what this stroke paints, in canvas coordinates.
    pub fn render_bounds(&self) -> Rect {
        let mut local = self.path.bounds();
        if let Some(mask) = &self.mask {
            local = local.intersect(mask.bounding_box());
        }
        self.transform.transform_rect_bbox(local)
    }

    /// Sample locations mapped into canvas coordinates.
    pub fn world_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.path
            .points()
            .iter()
            .map(move |point| self.transform * point.location)
    }

    /// Whether `other` is the same underlying stroke.
    ///
    /// The drawing surface does not keep object identity across copies, so this
    /// compares render bounds and transform. Two distinct strokes that share both are
    /// reported as the same stroke.
    pub fn same_stroke(&self, other: &Stroke) -> bool {
        self.transform == other.transform && self.render_bounds() == other.render_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    fn line_stroke(from: Point, to: Point, size: f64) -> Stroke {
        Stroke::new(Ink::default(), StrokePath::from_locations([from, to], size))
    }

    #[test]
    fn test_path_bounds_include_point_size() {
        let path =
            StrokePath::from_locations([Point::new(10.0, 10.0), Point::new(30.0, 20.0)], 4.0);
        assert_eq!(path.bounds(), Rect::new(8.0, 8.0, 32.0, 22.0));
    }

    #[test]
    fn test_empty_path_bounds() {
        assert_eq!(StrokePath::default().bounds(), Rect::ZERO);
        assert!(StrokePath::default().to_bez_path().elements().is_empty());
    }

    #[test]
    fn test_render_bounds_follow_transform() {
        let stroke = line_stroke(Point::new(0.0, 0.0), Point::new(10.0, 10.0), 0.0);
        let moved = stroke.with_transform(Affine::translate(Vec2::new(5.0, -5.0)));
        assert_eq!(moved.render_bounds(), Rect::new(5.0, -5.0, 15.0, 5.0));

        let scaled = stroke.with_transform(Affine::scale(2.0));
        assert_eq!(scaled.render_bounds(), Rect::new(0.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn test_mask_clips_render_bounds() {
        let stroke = line_stroke(Point::new(0.0, 0.0), Point::new(100.0, 100.0), 0.0)
            .with_mask(Rect::new(0.0, 0.0, 50.0, 50.0).to_path(0.1));
        assert_eq!(stroke.render_bounds(), Rect::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_with_transform_shares_geometry() {
        let stroke = line_stroke(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 2.0);
        let moved = stroke.with_transform(Affine::translate((1.0, 1.0)));
        assert!(Arc::ptr_eq(&stroke.path, &moved.path));
        assert_eq!(moved.ink, stroke.ink);
        assert_ne!(moved.transform, stroke.transform);
    }

    #[test]
    fn test_same_stroke_uses_bounds_and_transform() {
        let a = line_stroke(Point::new(0.0, 0.0), Point::new(10.0, 10.0), 0.0);
        let copy = a.clone();
        assert!(a.same_stroke(&copy));

        let moved = a.with_transform(Affine::translate((1.0, 0.0)));
        assert!(!a.same_stroke(&moved));

        // Different geometry, same box and transform: indistinguishable.
        let diagonal = line_stroke(Point::new(0.0, 10.0), Point::new(10.0, 0.0), 0.0);
        assert!(a.same_stroke(&diagonal));
    }

    #[test]
    fn test_world_points() {
        let stroke = line_stroke(Point::new(1.0, 2.0), Point::new(3.0, 4.0), 1.0)
            .with_transform(Affine::translate((10.0, 10.0)));
        let points: Vec<Point> = stroke.world_points().collect();
        assert_eq!(points, vec![Point::new(11.0, 12.0), Point::new(13.0, 14.0)]);
    }

    #[test]
    fn test_color_roundtrip_through_peniko() {
        let color = SerializableColor::new(10, 20, 30, 255);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }
}
