//! CPU rasterizer for exports.
//!
//! Strokes are painted as chains of round-capped segments with one pixel of
//! anti-aliasing, clipped by the stroke mask, and composited source-over.

use crate::renderer::{ExportOptions, RenderResult, RendererError, StrokeRenderer, paint_plan};
use image::{Rgba, RgbaImage};
use kurbo::{Affine, Point, Rect, Shape};
use strokemove_core::export::{ExportBackground, ExportPlan};
use strokemove_core::store::StrokeStore;
use strokemove_core::stroke::{SerializableColor, Stroke};

/// Largest width or height, in pixels, an export may have.
pub const MAX_EXPORT_DIMENSION: u32 = 8192;

/// A rendered export.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    image: RgbaImage,
    /// Canvas region the image covers.
    bounds: Rect,
    scale: f64,
}

impl ExportedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Encode as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder
                .write_header()
                .map_err(|e| RendererError::Encode(format!("header: {}", e)))?;
            writer
                .write_image_data(self.image.as_raw())
                .map_err(|e| RendererError::Encode(format!("image data: {}", e)))?;
            writer
                .finish()
                .map_err(|e| RendererError::Encode(format!("finish: {}", e)))?;
        }
        Ok(png_data)
    }
}

/// Pixel buffer that strokes are painted into.
pub struct RasterTarget {
    image: RgbaImage,
}

impl RasterTarget {
    /// Transparent target of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Blend `color` into the pixels covered by `coverage`, a `cols`-wide buffer whose
    /// top-left pixel is `origin`.
    fn composite(
        &mut self,
        coverage: &[f32],
        cols: usize,
        origin: (u32, u32),
        color: SerializableColor,
    ) {
        for (i, &cov) in coverage.iter().enumerate() {
            if cov <= 0.0 {
                continue;
            }
            let x = origin.0 + (i % cols) as u32;
            let y = origin.1 + (i / cols) as u32;
            let alpha = (color.a as f32 * cov).round().clamp(0.0, 255.0) as u8;
            let dst = self.image.get_pixel_mut(x, y);
            *dst = alpha_blend(*dst, Rgba([color.r, color.g, color.b, alpha]));
        }
    }
}

impl StrokeRenderer for RasterTarget {
    fn fill_background(&mut self, background: ExportBackground) {
        let pixel = match background {
            ExportBackground::Opaque(c) => Rgba([c.r, c.g, c.b, c.a]),
            ExportBackground::Transparent => Rgba([0, 0, 0, 0]),
        };
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    fn render_stroke(&mut self, stroke: &Stroke, view: Affine) {
        let transform = view * stroke.transform;
        let det = transform.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            log::debug!("Skipping stroke with degenerate transform {:?}", transform);
            return;
        }
        let radius_scale = det.abs().sqrt();

        let nibs: Vec<(Point, f64)> = stroke
            .path()
            .points()
            .iter()
            .map(|p| (transform * p.location, p.size.max(0.0) / 2.0 * radius_scale))
            .collect();
        let Some(&(first, _)) = nibs.first() else {
            return;
        };

        let reach = nibs.iter().map(|&(_, r)| r).fold(0.0, f64::max) + 1.0;
        let bbox = nibs
            .iter()
            .fold(Rect::from_points(first, first), |acc, &(p, _)| acc.union_pt(p))
            .inflate(reach, reach);

        let (width, height) = self.image.dimensions();
        let x0 = bbox.x0.floor().max(0.0) as u32;
        let y0 = bbox.y0.floor().max(0.0) as u32;
        let x1 = bbox.x1.ceil().clamp(0.0, width as f64) as u32;
        let y1 = bbox.y1.ceil().clamp(0.0, height as f64) as u32;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let cols = (x1 - x0) as usize;
        let rows = (y1 - y0) as usize;
        let mut coverage = vec![0.0f32; cols * rows];

        // A single sample is a dot.
        let segments: Vec<((Point, f64), (Point, f64))> = if nibs.len() == 1 {
            vec![(nibs[0], nibs[0])]
        } else {
            nibs.windows(2).map(|w| (w[0], w[1])).collect()
        };

        for ((a, ra), (b, rb)) in segments {
            let r = ra.max(rb) + 1.0;
            let seg = Rect::from_points(a, b).inflate(r, r);
            let sx0 = seg.x0.floor().max(x0 as f64) as u32;
            let sy0 = seg.y0.floor().max(y0 as f64) as u32;
            let sx1 = seg.x1.ceil().min(x1 as f64).max(sx0 as f64) as u32;
            let sy1 = seg.y1.ceil().min(y1 as f64).max(sy0 as f64) as u32;

            for py in sy0..sy1 {
                for px in sx0..sx1 {
                    let center = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                    let (distance, t) = distance_to_segment(center, a, b);
                    let radius = ra + (rb - ra) * t;
                    let cov = (radius + 0.5 - distance).clamp(0.0, 1.0) as f32;
                    let idx = (py - y0) as usize * cols + (px - x0) as usize;
                    if cov > coverage[idx] {
                        coverage[idx] = cov;
                    }
                }
            }
        }

        if let Some(mask) = stroke.mask() {
            let inverse = transform.inverse();
            for (i, cov) in coverage.iter_mut().enumerate() {
                if *cov <= 0.0 {
                    continue;
                }
                let center = Point::new(
                    (x0 as usize + i % cols) as f64 + 0.5,
                    (y0 as usize + i / cols) as f64 + 0.5,
                );
                if !mask.contains(inverse * center) {
                    *cov = 0.0;
                }
            }
        }

        self.composite(&coverage, cols, (x0, y0), stroke.ink.color);
    }
}

/// Distance from `p` to segment `ab`, and the clamped projection parameter.
fn distance_to_segment(p: Point, a: Point, b: Point) -> (f64, f64) {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 <= f64::EPSILON {
        return ((p - a).hypot(), 0.0);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    ((p - (a + ab * t)).hypot(), t)
}

/// Source-over compositing of straight-alpha RGBA8.
fn alpha_blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 || dst[3] == 0 {
        return src;
    }
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let inv = 1.0 / out_a;
    let channel = |i: usize| {
        ((src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) * inv)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Rasterizes export plans into RGBA images.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterRenderer;

impl RasterRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `plan` at `scale` pixels per canvas unit.
    pub fn render(
        &self,
        store: &StrokeStore,
        plan: &ExportPlan,
        scale: f64,
    ) -> RenderResult<ExportedImage> {
        let (width, height) = pixel_size(plan.bounds, scale)?;

        // Canvas region origin lands on pixel (0, 0).
        let view = Affine::scale(scale) * Affine::translate(-plan.bounds.origin().to_vec2());
        let mut target = RasterTarget::new(width, height);
        paint_plan(&mut target, store, plan, view);

        log::info!(
            "Rendered {} strokes into {}x{} image",
            plan.strokes.len(),
            width,
            height
        );
        Ok(ExportedImage {
            image: target.into_image(),
            bounds: plan.bounds,
            scale,
        })
    }

    /// Render with the given export options.
    pub fn export(
        &self,
        store: &StrokeStore,
        plan: &ExportPlan,
        options: &ExportOptions,
    ) -> RenderResult<ExportedImage> {
        self.render(store, plan, options.scale)
    }
}

fn pixel_size(bounds: Rect, scale: f64) -> RenderResult<(u32, u32)> {
    let width = (bounds.width() * scale).ceil();
    let height = (bounds.height() * scale).ceil();

    if !(width >= 1.0 && height >= 1.0) {
        return Err(RendererError::EmptyExport {
            width: width.max(0.0) as u32,
            height: height.max(0.0) as u32,
        });
    }
    if width > MAX_EXPORT_DIMENSION as f64 || height > MAX_EXPORT_DIMENSION as f64 {
        return Err(RendererError::TooLarge {
            width: width as u64,
            height: height as u64,
            max: MAX_EXPORT_DIMENSION,
        });
    }
    Ok((width as u32, height as u32))
}
