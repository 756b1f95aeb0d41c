// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vello CPU-backed implementation of the Fresco engine capability set.
//!
//! This crate implements [`Canvas`] and [`Surface`] on top of the
//! sparse-strips [`vello_cpu::RenderContext`], so the Canvas-2D emulation
//! layer can rasterize to pixels without a GPU.
//!
//! `vello_cpu` exposes a layer stack rather than Skia-style save/restore,
//! so this backend keeps its own frame stack: each `save` records the
//! transform and how many clip layers the frame pushed, and `restore` pops
//! exactly those layers. Blend modes, extra opacity, and mask blurs are
//! expressed as one-shot layers wrapped around the draw that needs them.
//!
//! Text is not a capability of this backend ([`Canvas::text`] returns
//! `None`); shaping belongs to the embedding application.

#![deny(unsafe_code)]

use fresco_engine::{
    Canvas, Color, Compose, EngineCaps, Image, ImageQuality, Paint, PaintStyle, Path, Surface,
};
use fresco_matrix::{Matrix33, m33};
use kurbo::{PathEl, Rect};
use peniko::{Brush, ImageData, ImageSampler};
use vello_common::filter_effects::{EdgeMode, Filter, FilterPrimitive};
use vello_cpu::kurbo::{
    Affine as CpuAffine, BezPath as CpuBezPath, Cap as CpuCap, Join as CpuJoin, Point as CpuPoint,
    Rect as CpuRect, Stroke as CpuStroke,
};
use vello_cpu::{Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings};

/// One `save` frame: the transform to reinstate and the number of vello
/// clip layers pushed while the frame was active.
#[derive(Copy, Clone, Debug)]
struct Frame {
    transform: Matrix33,
    clip_layers: u16,
}

/// Software raster surface rendering through `vello_cpu`.
pub struct VelloCpuSurface {
    ctx: RenderContext,
    width: u16,
    height: u16,
    transform: Matrix33,
    stack: Vec<Frame>,
    /// Clip layers pushed outside any save frame; never popped by restore.
    base_clip_layers: u16,
}

impl core::fmt::Debug for VelloCpuSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VelloCpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("transform", &self.transform)
            .field("save_depth", &self.stack.len())
            .field("base_clip_layers", &self.base_clip_layers)
            .finish_non_exhaustive()
    }
}

impl VelloCpuSurface {
    /// Creates a surface of the given pixel size.
    pub fn new(width: u16, height: u16) -> Self {
        let settings = RenderSettings {
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        Self {
            ctx: RenderContext::new_with(width, height, settings),
            width,
            height,
            transform: m33::identity(),
            stack: Vec::new(),
            base_clip_layers: 0,
        }
    }

    /// The underlying render context.
    pub fn render_context(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    /// Drops the projective row: `vello_cpu` transforms are affine only.
    fn to_cpu_affine(m: &Matrix33) -> CpuAffine {
        CpuAffine::new([m[0], m[3], m[1], m[4], m[2], m[5]])
    }

    fn to_cpu_bez(path: &Path) -> CpuBezPath {
        let mut out = CpuBezPath::new();
        let p = |pt: kurbo::Point| CpuPoint::new(pt.x, pt.y);
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(a) => out.move_to(p(a)),
                PathEl::LineTo(a) => out.line_to(p(a)),
                PathEl::QuadTo(a, b) => out.quad_to(p(a), p(b)),
                PathEl::CurveTo(a, b, c) => out.curve_to(p(a), p(b), p(c)),
                PathEl::ClosePath => out.close_path(),
            }
        }
        out
    }

    fn to_cpu_rect(rect: Rect) -> CpuRect {
        CpuRect::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }

    fn to_cpu_stroke(stroke: &kurbo::Stroke) -> CpuStroke {
        let mut out = CpuStroke::new(stroke.width);
        out.miter_limit = stroke.miter_limit;
        out.join = match stroke.join {
            kurbo::Join::Bevel => CpuJoin::Bevel,
            kurbo::Join::Miter => CpuJoin::Miter,
            kurbo::Join::Round => CpuJoin::Round,
        };
        out.start_cap = match stroke.start_cap {
            kurbo::Cap::Butt => CpuCap::Butt,
            kurbo::Cap::Round => CpuCap::Round,
            kurbo::Cap::Square => CpuCap::Square,
        };
        out.end_cap = match stroke.end_cap {
            kurbo::Cap::Butt => CpuCap::Butt,
            kurbo::Cap::Round => CpuCap::Round,
            kurbo::Cap::Square => CpuCap::Square,
        };
        out
    }

    fn sampler_for(paint: &Paint) -> ImageSampler {
        ImageSampler {
            quality: match paint.quality {
                ImageQuality::None => peniko::ImageQuality::Low,
                ImageQuality::Low | ImageQuality::Medium => peniko::ImageQuality::Medium,
                ImageQuality::High => peniko::ImageQuality::High,
            },
            ..ImageSampler::default()
        }
    }

    fn image_paint(image: &Image, sampler: ImageSampler) -> CpuImage {
        let image_data = ImageData {
            data: peniko::Blob::from(image.pixels.to_vec()),
            format: image.info.format,
            alpha_type: image.info.alpha_type,
            width: image.info.width,
            height: image.info.height,
        };
        CpuImage {
            image: ImageSource::from_peniko_image_data(&image_data),
            sampler,
        }
    }

    fn apply_brush(&mut self, paint: &Paint) {
        match &paint.brush {
            Brush::Solid(color) => self.ctx.set_paint(*color),
            Brush::Gradient(gradient) => self.ctx.set_paint(gradient.clone()),
            Brush::Image(image_brush) => {
                let source = ImageSource::from_peniko_image_data(&image_brush.image);
                self.ctx.set_paint(CpuImage {
                    image: source,
                    sampler: image_brush.sampler,
                });
            }
        }
    }

    /// Pushes the one-shot layer a paint needs for its blend mode, extra
    /// opacity, or mask blur. Returns whether a layer was pushed.
    ///
    /// Draws whose compose op consumes the backdrop (`Clear` and friends)
    /// clip the layer to `geometry` so the effect stays local to the drawn
    /// shape rather than wiping the whole surface.
    fn push_paint_layer(&mut self, paint: &Paint, geometry: Option<&CpuBezPath>) -> bool {
        let non_default_blend = paint.blend != peniko::BlendMode::default();
        let filter = paint.mask_blur.map(|sigma| {
            Filter::from_primitive(FilterPrimitive::GaussianBlur {
                std_deviation: sigma,
                edge_mode: EdgeMode::None,
            })
        });
        if !non_default_blend && paint.opacity.is_none() && filter.is_none() {
            return false;
        }
        let clip = if paint.blend.compose == Compose::Clear {
            geometry
        } else {
            None
        };
        self.ctx.push_layer(
            clip,
            non_default_blend.then_some(paint.blend),
            paint.opacity,
            None,
            filter,
        );
        true
    }

    fn pop_paint_layer(&mut self) {
        self.ctx.pop_layer();
    }

    fn render_pixels(&mut self) -> Vec<u8> {
        let mut pixmap = Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        let unpremul = pixmap.take_unpremultiplied();
        let mut bytes = Vec::with_capacity(unpremul.len() * 4);
        for p in unpremul {
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        bytes
    }
}

impl Canvas for VelloCpuSurface {
    fn save(&mut self) {
        self.stack.push(Frame {
            transform: self.transform,
            clip_layers: 0,
        });
    }

    fn restore(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        for _ in 0..frame.clip_layers {
            self.ctx.pop_layer();
        }
        self.transform = frame.transform;
        self.ctx.set_transform(Self::to_cpu_affine(&self.transform));
    }

    fn concat(&mut self, matrix: &Matrix33) {
        self.transform = m33::mul(&self.transform, matrix);
        self.ctx.set_transform(Self::to_cpu_affine(&self.transform));
    }

    fn set_matrix(&mut self, matrix: &Matrix33) {
        self.transform = *matrix;
        self.ctx.set_transform(Self::to_cpu_affine(&self.transform));
    }

    fn total_matrix(&self) -> Matrix33 {
        self.transform
    }

    fn clear(&mut self, color: Color) {
        let saved_transform = *self.ctx.transform();
        let saved_paint = self.ctx.paint().clone();
        self.ctx.set_transform(CpuAffine::IDENTITY);
        self.ctx.set_paint(color);
        self.ctx.fill_rect(&CpuRect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        self.ctx.set_transform(saved_transform);
        self.ctx.set_paint(saved_paint);
    }

    fn draw_path(&mut self, path: &Path, paint: &Paint) {
        let bez = Self::to_cpu_bez(path);
        let pushed = self.push_paint_layer(paint, Some(&bez));
        self.apply_brush(paint);
        match paint.style {
            PaintStyle::Fill => {
                self.ctx.set_fill_rule(path.fill_rule());
                self.ctx.fill_path(&bez);
            }
            PaintStyle::Stroke => {
                if paint.stroke.dash_pattern.is_empty() {
                    self.ctx.set_stroke(Self::to_cpu_stroke(&paint.stroke));
                    self.ctx.stroke_path(&bez);
                } else {
                    // vello_cpu strokes ignore dash patterns; expand the
                    // dashed stroke to a fill outline instead.
                    let outline = Self::to_cpu_bez(&path.stroke_outline(&paint.stroke, 0.01));
                    self.ctx.set_fill_rule(peniko::Fill::NonZero);
                    self.ctx.fill_path(&outline);
                }
            }
        }
        if pushed {
            self.pop_paint_layer();
        }
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        match paint.style {
            PaintStyle::Fill => {
                let cpu_rect = Self::to_cpu_rect(rect);
                let geometry = (paint.blend.compose == Compose::Clear).then(|| {
                    let mut path = Path::new();
                    path.add_rect(rect);
                    Self::to_cpu_bez(&path)
                });
                let pushed = self.push_paint_layer(paint, geometry.as_ref());
                self.apply_brush(paint);
                self.ctx.fill_rect(&cpu_rect);
                if pushed {
                    self.pop_paint_layer();
                }
            }
            PaintStyle::Stroke => {
                // Route through draw_path so dashes and layers are handled
                // uniformly.
                let mut path = Path::new();
                path.add_rect(rect);
                self.draw_path(&path, paint);
            }
        }
    }

    fn clip_path(&mut self, path: &Path) {
        let bez = Self::to_cpu_bez(path);
        self.ctx.set_fill_rule(path.fill_rule());
        self.ctx.push_clip_layer(&bez);
        match self.stack.last_mut() {
            Some(frame) => frame.clip_layers += 1,
            None => self.base_clip_layers += 1,
        }
    }

    fn draw_image_rect(&mut self, image: &Image, src: Rect, dst: Rect, paint: &Paint) {
        let dst_w = dst.width();
        let dst_h = dst.height();
        let src_w = src.width();
        let src_h = src.height();
        if dst_w.abs() < f64::EPSILON
            || dst_h.abs() < f64::EPSILON
            || src_w.abs() < f64::EPSILON
            || src_h.abs() < f64::EPSILON
        {
            return;
        }

        let pushed = self.push_paint_layer(paint, None);

        let saved_transform = *self.ctx.transform();
        let saved_paint = self.ctx.paint().clone();

        // Clip to the destination in the current (non-image) transform.
        let mut dst_path = CpuBezPath::new();
        dst_path.move_to(CpuPoint::new(dst.x0, dst.y0));
        dst_path.line_to(CpuPoint::new(dst.x1, dst.y0));
        dst_path.line_to(CpuPoint::new(dst.x1, dst.y1));
        dst_path.line_to(CpuPoint::new(dst.x0, dst.y1));
        dst_path.close_path();
        self.ctx.push_clip_layer(&dst_path);

        // Map image pixel space onto the destination rectangle.
        let local = CpuAffine::translate((dst.x0, dst.y0))
            * CpuAffine::scale_non_uniform(dst_w / src_w, dst_h / src_h)
            * CpuAffine::translate((-src.x0, -src.y0));
        self.ctx.set_transform(saved_transform * local);
        self.ctx
            .set_paint(Self::image_paint(image, Self::sampler_for(paint)));
        self.ctx.fill_rect(&CpuRect::new(
            0.0,
            0.0,
            f64::from(image.info.width),
            f64::from(image.info.height),
        ));

        self.ctx.pop_layer();
        self.ctx.set_transform(saved_transform);
        self.ctx.set_paint(saved_paint);

        if pushed {
            self.pop_paint_layer();
        }
    }

    fn read_pixels(&mut self, x: i32, y: i32, width: u32, height: u32) -> Option<Vec<u8>> {
        if x < 0 || y < 0 || width == 0 || height == 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x + width > u32::from(self.width) || y + height > u32::from(self.height) {
            return None;
        }
        let full = self.render_pixels();
        let surface_width = usize::from(self.width);
        let mut out = Vec::with_capacity(width as usize * height as usize * 4);
        for row in y..y + height {
            let begin = (row as usize * surface_width + x as usize) * 4;
            out.extend_from_slice(&full[begin..begin + width as usize * 4]);
        }
        Some(out)
    }

    fn capabilities(&self) -> EngineCaps {
        EngineCaps::IMAGES | EngineCaps::PIXEL_READBACK
    }
}

impl Surface for VelloCpuSurface {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        self
    }

    fn flush(&mut self) {
        self.ctx.flush();
    }

    fn make_image_snapshot(&mut self) -> Image {
        let pixels = self.render_pixels();
        Image::from_rgba8(&pixels, u32::from(self.width), u32::from(self.height))
            .expect("rendered buffer matches surface dimensions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(bytes: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]
    }

    #[test]
    fn fill_rect_renders_solid_pixels() {
        let mut surface = VelloCpuSurface::new(16, 16);
        let paint = Paint {
            brush: Brush::Solid(Color::from_rgba8(255, 0, 0, 255)),
            ..Paint::default()
        };
        surface.draw_rect(Rect::new(0.0, 0.0, 8.0, 16.0), &paint);
        let img = surface.make_image_snapshot();
        assert_eq!(pixel(&img.pixels, 16, 2, 2), [255, 0, 0, 255]);
        assert_eq!(pixel(&img.pixels, 16, 12, 2)[3], 0);
    }

    #[test]
    fn clear_compose_erases_only_the_rect() {
        let mut surface = VelloCpuSurface::new(16, 16);
        let opaque = Paint {
            brush: Brush::Solid(Color::from_rgba8(0, 255, 0, 255)),
            ..Paint::default()
        };
        surface.draw_rect(Rect::new(0.0, 0.0, 16.0, 16.0), &opaque);
        let clear = Paint {
            blend: peniko::BlendMode {
                mix: peniko::Mix::Normal,
                compose: Compose::Clear,
            },
            ..Paint::default()
        };
        surface.draw_rect(Rect::new(4.0, 4.0, 12.0, 12.0), &clear);
        let img = surface.make_image_snapshot();
        assert_eq!(pixel(&img.pixels, 16, 8, 8)[3], 0);
        assert_eq!(pixel(&img.pixels, 16, 1, 1), [0, 255, 0, 255]);
    }

    #[test]
    fn save_restore_rewinds_clips_and_transform() {
        let mut surface = VelloCpuSurface::new(16, 16);
        surface.save();
        surface.translate(4.0, 0.0);
        let mut clip = Path::new();
        clip.add_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        surface.clip_path(&clip);
        surface.restore();
        assert_eq!(surface.total_matrix(), m33::identity());

        // After restore the clip is gone: a full-surface fill reaches every pixel.
        let paint = Paint {
            brush: Brush::Solid(Color::from_rgba8(0, 0, 255, 255)),
            ..Paint::default()
        };
        surface.draw_rect(Rect::new(0.0, 0.0, 16.0, 16.0), &paint);
        let img = surface.make_image_snapshot();
        assert_eq!(pixel(&img.pixels, 16, 15, 15), [0, 0, 255, 255]);
    }

    #[test]
    fn read_pixels_is_windowed() {
        let mut surface = VelloCpuSurface::new(8, 8);
        let paint = Paint {
            brush: Brush::Solid(Color::from_rgba8(10, 20, 30, 255)),
            ..Paint::default()
        };
        surface.draw_rect(Rect::new(0.0, 0.0, 8.0, 8.0), &paint);
        let block = surface.read_pixels(2, 2, 3, 3).expect("in-bounds read");
        assert_eq!(block.len(), 3 * 3 * 4);
        assert_eq!(&block[0..4], &[10, 20, 30, 255]);
        assert!(surface.read_pixels(7, 7, 4, 4).is_none());
    }
}
