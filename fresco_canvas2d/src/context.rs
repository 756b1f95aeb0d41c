// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Canvas-2D-compatible drawing context.

use core::f64::consts::PI;

use fresco_css_color::{multiply_by_alpha, parse_color};
use fresco_engine::{Brush, FillRule, Image, ImageQuality, Paint, PaintStyle, Path, Surface};
use fresco_matrix::{Matrix33, m33};
use kurbo::{Cap, Join, Rect, Stroke};
use peniko::{BlendMode, Compose, Mix};

use crate::font::parse_font;
use crate::state::{DrawState, SmoothingQuality, composite_operation_keyword, parse_composite_operation};
use crate::style::{FillStyle, LinearGradient, RadialGradient};
use crate::{CanvasError, ImageData, TextMetrics};

/// Stroke precision used when hit-testing strokes.
const STROKE_HIT_TOLERANCE: f64 = 0.3;

/// Sweeps within this many degrees of a full revolution are treated as one.
const FULL_SWEEP_EPSILON: f64 = 1e-5;

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// A drawing context emulating the HTML `CanvasRenderingContext2D` state
/// machine on top of an engine [`Surface`].
///
/// The context owns the in-progress path, the style state, and the
/// save/restore stack; the engine's canvas owns the transform and the
/// clip. Every method is synchronous and runs to completion; invalid input
/// follows the canvas error model (silently ignored, except for negative
/// radii which return [`CanvasError::NegativeRadius`]).
///
/// Path coordinates are recorded in user space. When the transform
/// changes mid-path, the already-recorded segments are re-expressed in the
/// new user space so they stay anchored where they were drawn.
#[derive(Debug)]
pub struct Context2d<S: Surface> {
    surface: S,
    path: Path,
    state: DrawState,
    saved: Vec<(DrawState, Matrix33)>,
    /// Mirror of the engine canvas's current transform.
    transform: Matrix33,
}

impl<S: Surface> Context2d<S> {
    /// Wraps a surface in a fresh context with default canvas state.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            path: Path::new(),
            state: DrawState::default(),
            saved: Vec::new(),
            transform: m33::identity(),
        }
    }

    /// The underlying surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The underlying surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The in-progress path, in user space.
    pub fn current_path(&self) -> &Path {
        &self.path
    }

    /// The current transform as a row-major 3x3 matrix.
    pub fn current_transform(&self) -> Matrix33 {
        self.transform
    }

    // --- Path building -----------------------------------------------------

    /// Discards the current path and starts an empty one.
    pub fn begin_path(&mut self) {
        self.path = Path::new();
    }

    /// Begins a new subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f64, y: f64) {
        if !all_finite(&[x, y]) {
            return;
        }
        self.path.move_to(x, y);
    }

    /// Adds a line from the current point to `(x, y)`.
    ///
    /// On an empty path this records only the implicit move: the first
    /// coordinate of a subpath is a point, not a segment from anywhere.
    pub fn line_to(&mut self, x: f64, y: f64) {
        if !all_finite(&[x, y]) {
            return;
        }
        if self.ensure_subpath(x, y) {
            self.path.line_to(x, y);
        }
    }

    /// Adds a quadratic Bézier curve.
    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        if !all_finite(&[cpx, cpy, x, y]) {
            return;
        }
        // A curve on an empty path still draws, from an implicit move to
        // its control point.
        self.ensure_subpath(cpx, cpy);
        self.path.quad_to(cpx, cpy, x, y);
    }

    /// Adds a cubic Bézier curve.
    pub fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        if !all_finite(&[cp1x, cp1y, cp2x, cp2y, x, y]) {
            return;
        }
        self.ensure_subpath(cp1x, cp1y);
        self.path.cubic_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    /// Adds an arc tangent to the lines toward `(x1, y1)` and `(x2, y2)`.
    ///
    /// Non-finite arguments are ignored; a negative radius is an error and
    /// leaves the path untouched.
    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<(), CanvasError> {
        if !all_finite(&[x1, y1, x2, y2, radius]) {
            return Ok(());
        }
        if radius < 0.0 {
            return Err(CanvasError::NegativeRadius);
        }
        self.ensure_subpath(x1, y1);
        self.path.tangent_arc_to(x1, y1, x2, y2, radius);
        Ok(())
    }

    /// Closes the current subpath.
    ///
    /// A no-op on an empty path, and on a degenerate single-point subpath:
    /// closing nothing must not emit a close verb that would affect caps
    /// or hit testing.
    pub fn close_path(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let bounds = self.path.bounds();
        if bounds.width() != 0.0 || bounds.height() != 0.0 {
            self.path.close();
        }
    }

    /// Adds a closed rectangle subpath, then starts a fresh subpath at the
    /// rectangle's origin so a following `line_to` continues from there.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if !all_finite(&[x, y, width, height]) {
            return;
        }
        self.path.add_rect(Rect::new(x, y, x + width, y + height));
        self.path.move_to(x, y);
    }

    /// Adds a circular arc. Defined entirely in terms of [`Self::ellipse`].
    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        ccw: bool,
    ) -> Result<(), CanvasError> {
        self.ellipse(x, y, radius, radius, 0.0, start_angle, end_angle, ccw)
    }

    /// Adds an elliptical arc centered at `(x, y)` with the given radii and
    /// rotation, sweeping from `start_angle` to `end_angle` (radians).
    pub fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        ccw: bool,
    ) -> Result<(), CanvasError> {
        if !all_finite(&[x, y, radius_x, radius_y, rotation, start_angle, end_angle]) {
            return Ok(());
        }
        if radius_x < 0.0 || radius_y < 0.0 {
            return Err(CanvasError::NegativeRadius);
        }

        let tau = 2.0 * PI;
        // Canonicalize: bring the start angle into [0, tau) and shift the
        // end angle by the same amount.
        let mut start = start_angle % tau;
        if start < 0.0 {
            start += tau;
        }
        let mut end = end_angle + (start - start_angle);

        // Clamp the sweep to at most one revolution in the travel
        // direction; wrong-direction orderings wrap around once.
        if !ccw && end - start >= tau {
            end = start + tau;
        } else if ccw && start - end >= tau {
            end = start - tau;
        } else if !ccw && start > end {
            end = start + (tau - (start - end) % tau);
        } else if ccw && start < end {
            end = start - (tau - (end - start) % tau);
        }

        if rotation == 0.0 {
            self.ellipse_arcs(x, y, radius_x, radius_y, start, end);
            return Ok(());
        }
        // The oval primitive is axis-aligned: rotate the path into the
        // oval's frame, draw, and rotate back.
        let rotated = m33::rotated(rotation, x, y);
        if let Some(inverse) = m33::invert(&rotated) {
            self.path.transform(&inverse);
        }
        self.ellipse_arcs(x, y, radius_x, radius_y, start, end);
        self.path.transform(&rotated);
        Ok(())
    }

    /// Appends the arc sweep as oval-arc segments.
    ///
    /// A ~full revolution is split into two half sweeps over the same oval
    /// because the primitive renders an exact 360-degree sweep as nothing;
    /// the halves share endpoints, so the stroke shows no seam. Helpers
    /// that auto-close the contour are deliberately not used.
    fn ellipse_arcs(&mut self, x: f64, y: f64, rx: f64, ry: f64, start: f64, end: f64) {
        let start_deg = start.to_degrees();
        let sweep_deg = (end - start).to_degrees();
        let oval = Rect::new(x - rx, y - ry, x + rx, y + ry);
        if (sweep_deg.abs() - 360.0).abs() < FULL_SWEEP_EPSILON {
            let half = sweep_deg / 2.0;
            self.path.oval_arc_to(oval, start_deg, half, false);
            self.path.oval_arc_to(oval, start_deg + half, half, false);
        } else {
            self.path.oval_arc_to(oval, start_deg, sweep_deg, false);
        }
    }

    /// Starts a subpath if none exists yet.
    ///
    /// Returns `false` when the call's coordinates were consumed as the
    /// subpath's first point, in which case a line-like caller must not
    /// also emit its segment.
    fn ensure_subpath(&mut self, x: f64, y: f64) -> bool {
        if self.path.is_empty() {
            self.path.move_to(x, y);
            return false;
        }
        true
    }

    // --- Transforms --------------------------------------------------------

    /// Concatenates the 2D affine `[a c e / b d f / 0 0 1]` onto the
    /// current transform.
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        if !all_finite(&[a, b, c, d, e, f]) {
            return;
        }
        let matrix = [a, c, e, b, d, f, 0.0, 0.0, 1.0];
        // Re-express recorded path points in the new user space so they
        // stay anchored where they were drawn.
        if let Some(inverse) = m33::invert(&matrix) {
            self.path.transform(&inverse);
        }
        self.surface.canvas().concat(&matrix);
        self.sync_transform();
    }

    /// Replaces the current transform with the 2D affine
    /// `[a c e / b d f / 0 0 1]`.
    pub fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        if !all_finite(&[a, b, c, d, e, f]) {
            return;
        }
        self.reset_transform();
        self.transform(a, b, c, d, e, f);
    }

    /// Resets the transform to the identity, committing it into the
    /// recorded path.
    pub fn reset_transform(&mut self) {
        self.path.transform(&self.transform);
        if let Some(inverse) = m33::invert(&self.transform) {
            self.surface.canvas().concat(&inverse);
        }
        self.sync_transform();
    }

    /// Translates the user space.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        if !all_finite(&[dx, dy]) {
            return;
        }
        self.path.transform(&m33::translated(-dx, -dy));
        self.surface.canvas().translate(dx, dy);
        self.sync_transform();
    }

    /// Scales the user space.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        if !all_finite(&[sx, sy]) {
            return;
        }
        self.path.transform(&m33::scaled(1.0 / sx, 1.0 / sy, 0.0, 0.0));
        self.surface.canvas().scale(sx, sy);
        self.sync_transform();
    }

    /// Rotates the user space about the origin.
    pub fn rotate(&mut self, radians: f64) {
        if !radians.is_finite() {
            return;
        }
        self.path.transform(&m33::rotated(-radians, 0.0, 0.0));
        self.surface.canvas().rotate(radians, 0.0, 0.0);
        self.sync_transform();
    }

    fn sync_transform(&mut self) {
        self.transform = self.surface.canvas().total_matrix();
    }

    // --- Save / restore ----------------------------------------------------

    /// Pushes the style state and transform onto the save stack.
    ///
    /// The snapshot is a deep copy: later mutation of the live state does
    /// not alter it.
    pub fn save(&mut self) {
        self.saved.push((self.state.clone(), self.transform));
        self.surface.canvas().save();
    }

    /// Pops the save stack. A no-op if the stack is empty.
    pub fn restore(&mut self) {
        let Some((state, saved_transform)) = self.saved.pop() else {
            return;
        };
        // Re-express recorded path points in the restored user space.
        if let Some(inverse) = m33::invert(&saved_transform) {
            let delta = m33::mul(&inverse, &self.transform);
            self.path.transform(&delta);
        }
        self.state = state;
        self.surface.canvas().restore();
        self.sync_transform();
    }

    // --- Style properties --------------------------------------------------

    /// The current fill style.
    pub fn fill_style(&self) -> &FillStyle {
        &self.state.fill_style
    }

    /// Sets the fill style from a color string, a parsed color, or a
    /// gradient.
    pub fn set_fill_style(&mut self, style: impl Into<FillStyle>) {
        self.state.fill_style = style.into();
    }

    /// The current stroke style.
    pub fn stroke_style(&self) -> &FillStyle {
        &self.state.stroke_style
    }

    /// Sets the stroke style from a color string, a parsed color, or a
    /// gradient.
    pub fn set_stroke_style(&mut self, style: impl Into<FillStyle>) {
        self.state.stroke_style = style.into();
    }

    /// The current line width.
    pub fn line_width(&self) -> f64 {
        self.state.line_width
    }

    /// Sets the line width. Zero, negative, and non-finite values are
    /// ignored, keeping the previous width.
    pub fn set_line_width(&mut self, width: f64) {
        if !width.is_finite() || width <= 0.0 {
            return;
        }
        self.state.line_width = width;
    }

    /// The current line cap.
    pub fn line_cap(&self) -> Cap {
        self.state.line_cap
    }

    /// Sets the line cap.
    pub fn set_line_cap(&mut self, cap: Cap) {
        self.state.line_cap = cap;
    }

    /// The current line join.
    pub fn line_join(&self) -> Join {
        self.state.line_join
    }

    /// Sets the line join.
    pub fn set_line_join(&mut self, join: Join) {
        self.state.line_join = join;
    }

    /// The current miter limit.
    pub fn miter_limit(&self) -> f64 {
        self.state.miter_limit
    }

    /// Sets the miter limit. Zero, negative, and non-finite values are
    /// ignored.
    pub fn set_miter_limit(&mut self, limit: f64) {
        if !limit.is_finite() || limit <= 0.0 {
            return;
        }
        self.state.miter_limit = limit;
    }

    /// The current dash pattern.
    pub fn line_dash(&self) -> &[f64] {
        &self.state.line_dash
    }

    /// Sets the dash pattern.
    ///
    /// Entries must be finite and non-negative or the whole assignment is
    /// ignored with a diagnostic; an odd-length list is concatenated with
    /// itself to make it even.
    pub fn set_line_dash(&mut self, dashes: &[f64]) {
        if dashes.iter().any(|d| !d.is_finite() || *d < 0.0) {
            log::warn!("dash list must have positive, finite values");
            return;
        }
        let mut list = dashes.to_vec();
        if list.len() % 2 == 1 {
            list.extend_from_slice(dashes);
        }
        self.state.line_dash = list;
    }

    /// The current dash offset.
    pub fn line_dash_offset(&self) -> f64 {
        self.state.line_dash_offset
    }

    /// Sets the dash offset. Non-finite values are ignored.
    pub fn set_line_dash_offset(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.state.line_dash_offset = offset;
    }

    /// The current global alpha.
    pub fn global_alpha(&self) -> f64 {
        self.state.global_alpha
    }

    /// Sets the global alpha. Values outside `[0, 1]` and non-finite
    /// values are ignored.
    pub fn set_global_alpha(&mut self, alpha: f64) {
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return;
        }
        self.state.global_alpha = alpha;
    }

    /// The current composite operation keyword.
    pub fn global_composite_operation(&self) -> &'static str {
        composite_operation_keyword(self.state.composite)
    }

    /// Sets the composite operation from its CSS keyword. Unknown and
    /// unsupported keywords are ignored with a diagnostic.
    pub fn set_global_composite_operation(&mut self, keyword: &str) {
        match parse_composite_operation(keyword) {
            Some(mode) => self.state.composite = mode,
            None => log::warn!("unsupported composite operation {keyword:?}"),
        }
    }

    /// The current shadow offset along x.
    pub fn shadow_offset_x(&self) -> f64 {
        self.state.shadow_offset_x
    }

    /// Sets the shadow x offset. Non-finite values are ignored.
    pub fn set_shadow_offset_x(&mut self, offset: f64) {
        if offset.is_finite() {
            self.state.shadow_offset_x = offset;
        }
    }

    /// The current shadow offset along y.
    pub fn shadow_offset_y(&self) -> f64 {
        self.state.shadow_offset_y
    }

    /// Sets the shadow y offset. Non-finite values are ignored.
    pub fn set_shadow_offset_y(&mut self, offset: f64) {
        if offset.is_finite() {
            self.state.shadow_offset_y = offset;
        }
    }

    /// The current shadow blur.
    pub fn shadow_blur(&self) -> f64 {
        self.state.shadow_blur
    }

    /// Sets the shadow blur. Negative and non-finite values are ignored
    /// (zero is allowed).
    pub fn set_shadow_blur(&mut self, blur: f64) {
        if !blur.is_finite() || blur < 0.0 {
            return;
        }
        self.state.shadow_blur = blur;
    }

    /// The current shadow color, serialized.
    pub fn shadow_color(&self) -> String {
        self.state.shadow_color.to_css_string()
    }

    /// Sets the shadow color from a CSS color string.
    pub fn set_shadow_color(&mut self, color: &str) {
        self.state.shadow_color = parse_color(color);
    }

    /// The current font shorthand, as assigned.
    pub fn font(&self) -> &str {
        &self.state.font_string
    }

    /// Sets the font from a CSS shorthand; resolved once at assignment.
    pub fn set_font(&mut self, shorthand: &str) {
        self.state.font = parse_font(shorthand);
        self.state.font_string = shorthand.to_string();
    }

    /// Whether image smoothing is enabled.
    pub fn image_smoothing_enabled(&self) -> bool {
        self.state.image_smoothing_enabled
    }

    /// Enables or disables image smoothing.
    pub fn set_image_smoothing_enabled(&mut self, enabled: bool) {
        self.state.image_smoothing_enabled = enabled;
    }

    /// The current image smoothing quality.
    pub fn image_smoothing_quality(&self) -> SmoothingQuality {
        self.state.image_smoothing_quality
    }

    /// Sets the image smoothing quality.
    pub fn set_image_smoothing_quality(&mut self, quality: SmoothingQuality) {
        self.state.image_smoothing_quality = quality;
    }

    // --- Paint construction ------------------------------------------------

    /// A fresh fill paint from the current style snapshot.
    fn fill_paint(&self) -> Paint {
        let mut paint = Paint {
            style: PaintStyle::Fill,
            blend: self.state.composite,
            ..Paint::default()
        };
        self.apply_brush(&mut paint, &self.state.fill_style);
        paint
    }

    /// A fresh stroke paint from the current style snapshot, carrying the
    /// line width, caps, joins, miter limit, and dash pattern.
    fn stroke_paint(&self) -> Paint {
        let mut paint = Paint {
            style: PaintStyle::Stroke,
            blend: self.state.composite,
            ..Paint::default()
        };
        self.apply_brush(&mut paint, &self.state.stroke_style);
        let mut stroke = Stroke::new(self.state.line_width)
            .with_caps(self.state.line_cap)
            .with_join(self.state.line_join)
            .with_miter_limit(self.state.miter_limit);
        if !self.state.line_dash.is_empty() {
            stroke = stroke.with_dashes(self.state.line_dash_offset, self.state.line_dash.iter().copied());
        }
        paint.stroke = stroke;
        paint
    }

    fn apply_brush(&self, paint: &mut Paint, style: &FillStyle) {
        match style {
            FillStyle::Color(color) => {
                let color = multiply_by_alpha(*color, self.state.global_alpha);
                paint.brush = Brush::Solid(color.to_peniko());
            }
            FillStyle::LinearGradient(gradient) => {
                paint.brush = Brush::Gradient(gradient.to_brush());
                paint.opacity = self.alpha_layer();
            }
            FillStyle::RadialGradient(gradient) => {
                paint.brush = Brush::Gradient(gradient.to_brush());
                paint.opacity = self.alpha_layer();
            }
        }
    }

    fn alpha_layer(&self) -> Option<f32> {
        (self.state.global_alpha < 1.0).then(|| self.state.global_alpha as f32)
    }

    /// The shadow variant of `base`, or `None` when no shadow would show:
    /// the shadow color's alpha (after global alpha) is zero, or blur and
    /// both offsets are all zero.
    fn shadow_paint(&self, base: &Paint) -> Option<Paint> {
        let color = multiply_by_alpha(self.state.shadow_color, self.state.global_alpha);
        if color.a == 0.0 {
            return None;
        }
        if self.state.shadow_blur == 0.0
            && self.state.shadow_offset_x == 0.0
            && self.state.shadow_offset_y == 0.0
        {
            return None;
        }
        let mut paint = base.clone();
        paint.brush = Brush::Solid(color.to_peniko());
        paint.opacity = None;
        // Very little blur below one; half the CSS blur radius is the
        // Gaussian sigma.
        paint.mask_blur = Some(f64::max(1.0, self.state.shadow_blur / 2.0) as f32);
        Some(paint)
    }

    /// The shadow translation, with the transform's axis scales unapplied:
    /// shadow offsets are specified in device-ish space and must not scale
    /// with user-space zoom.
    fn shadow_offset_matrix(&self) -> Matrix33 {
        let sx = self.transform[0];
        let sy = self.transform[4];
        m33::translated(
            self.state.shadow_offset_x / sx,
            self.state.shadow_offset_y / sy,
        )
    }

    // --- Drawing -----------------------------------------------------------

    /// Fills the current path under the non-zero rule.
    pub fn fill(&mut self) {
        self.fill_with_rule(FillRule::NonZero);
    }

    /// Fills the current path under an explicit fill rule.
    pub fn fill_with_rule(&mut self, rule: FillRule) {
        self.path.set_fill_rule(rule);
        let paint = self.fill_paint();
        let shadow = self.shadow_paint(&paint);
        let offset = self.shadow_offset_matrix();
        let canvas = self.surface.canvas();
        if let Some(shadow_paint) = shadow {
            canvas.save();
            canvas.concat(&offset);
            canvas.draw_path(&self.path, &shadow_paint);
            canvas.restore();
        }
        canvas.draw_path(&self.path, &paint);
    }

    /// Strokes the current path.
    pub fn stroke(&mut self) {
        let paint = self.stroke_paint();
        let shadow = self.shadow_paint(&paint);
        let offset = self.shadow_offset_matrix();
        let canvas = self.surface.canvas();
        if let Some(shadow_paint) = shadow {
            canvas.save();
            canvas.concat(&offset);
            canvas.draw_path(&self.path, &shadow_paint);
            canvas.restore();
        }
        canvas.draw_path(&self.path, &paint);
    }

    /// Fills a rectangle directly, without touching the current path.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let paint = self.fill_paint();
        self.surface
            .canvas()
            .draw_rect(Rect::new(x, y, x + width, y + height), &paint);
    }

    /// Strokes a rectangle directly, without touching the current path.
    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let paint = self.stroke_paint();
        self.surface
            .canvas()
            .draw_rect(Rect::new(x, y, x + width, y + height), &paint);
    }

    /// Erases a rectangle to transparent black.
    pub fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let paint = Paint {
            blend: BlendMode {
                mix: Mix::Normal,
                compose: Compose::Clear,
            },
            ..Paint::default()
        };
        self.surface
            .canvas()
            .draw_rect(Rect::new(x, y, x + width, y + height), &paint);
    }

    /// Intersects the clip with the current path under the non-zero rule.
    pub fn clip(&mut self) {
        self.clip_with_rule(FillRule::NonZero);
    }

    /// Intersects the clip with the current path under an explicit rule.
    pub fn clip_with_rule(&mut self, rule: FillRule) {
        let mut clip = self.path.clone();
        clip.set_fill_rule(rule);
        self.surface.canvas().clip_path(&clip);
    }

    /// Point-in-path test under the non-zero rule. The point is in device
    /// coordinates, unaffected by the current transform.
    pub fn is_point_in_path(&self, x: f64, y: f64) -> bool {
        self.is_point_in_path_with_rule(x, y, FillRule::NonZero)
    }

    /// Point-in-path test under an explicit rule.
    pub fn is_point_in_path_with_rule(&self, x: f64, y: f64, rule: FillRule) -> bool {
        if !all_finite(&[x, y]) {
            return false;
        }
        let Some(inverse) = m33::invert(&self.transform) else {
            return false;
        };
        let (lx, ly) = m33::map_point(&inverse, x, y);
        let mut path = self.path.clone();
        path.set_fill_rule(rule);
        path.contains(lx, ly)
    }

    /// Point-in-stroke test against the current stroke parameters (without
    /// dashes, always non-zero). The point is in device coordinates.
    pub fn is_point_in_stroke(&self, x: f64, y: f64) -> bool {
        if !all_finite(&[x, y]) {
            return false;
        }
        let Some(inverse) = m33::invert(&self.transform) else {
            return false;
        };
        let (lx, ly) = m33::map_point(&inverse, x, y);
        let stroke = Stroke::new(self.state.line_width)
            .with_caps(self.state.line_cap)
            .with_join(self.state.line_join)
            .with_miter_limit(self.state.miter_limit);
        let outline = self.path.stroke_outline(&stroke, STROKE_HIT_TOLERANCE);
        outline.contains(lx, ly)
    }

    // --- Text --------------------------------------------------------------

    /// Fills `text` with its baseline origin at `(x, y)`.
    ///
    /// A harmless no-op on engines without the text capability.
    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let paint = self.fill_paint();
        self.draw_text_with_paint(text, x, y, paint);
    }

    /// Strokes `text` with its baseline origin at `(x, y)`.
    pub fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        let paint = self.stroke_paint();
        self.draw_text_with_paint(text, x, y, paint);
    }

    fn draw_text_with_paint(&mut self, text: &str, x: f64, y: f64, paint: Paint) {
        let shadow = self.shadow_paint(&paint);
        let offset = self.shadow_offset_matrix();
        let font = self.state.font.clone();
        let canvas = self.surface.canvas();
        if canvas.text().is_none() {
            log::debug!("engine has no text capability; dropping text draw");
            return;
        }
        if let Some(shadow_paint) = shadow {
            canvas.save();
            canvas.concat(&offset);
            if let Some(text_canvas) = canvas.text() {
                text_canvas.draw_text(text, x, y, &font, &shadow_paint);
            }
            canvas.restore();
        }
        if let Some(text_canvas) = canvas.text() {
            text_canvas.draw_text(text, x, y, &font, &paint);
        }
    }

    /// Measures `text` in the current font.
    ///
    /// Reports zero width on engines without the text capability.
    pub fn measure_text(&mut self, text: &str) -> TextMetrics {
        let font = self.state.font.clone();
        let width = self
            .surface
            .canvas()
            .text()
            .map_or(0.0, |t| t.measure_text(text, &font));
        TextMetrics { width }
    }

    // --- Images ------------------------------------------------------------

    /// Draws an image at its natural size.
    pub fn draw_image(&mut self, image: &Image, dx: f64, dy: f64) {
        let (w, h) = (f64::from(image.info.width), f64::from(image.info.height));
        self.draw_image_with_size(image, dx, dy, w, h);
    }

    /// Draws an image scaled into a destination rectangle.
    pub fn draw_image_with_size(&mut self, image: &Image, dx: f64, dy: f64, dw: f64, dh: f64) {
        let (w, h) = (f64::from(image.info.width), f64::from(image.info.height));
        self.draw_image_src_dst(image, 0.0, 0.0, w, h, dx, dy, dw, dh);
    }

    /// Draws a source rectangle of an image into a destination rectangle.
    pub fn draw_image_src_dst(
        &mut self,
        image: &Image,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) {
        if !all_finite(&[sx, sy, sw, sh, dx, dy, dw, dh]) {
            return;
        }
        let paint = self.image_paint();
        self.surface.canvas().draw_image_rect(
            image,
            Rect::new(sx, sy, sx + sw, sy + sh),
            Rect::new(dx, dy, dx + dw, dy + dh),
            &paint,
        );
    }

    /// The paint for image draws: global alpha, composite mode, and the
    /// smoothing configuration.
    fn image_paint(&self) -> Paint {
        Paint {
            blend: self.state.composite,
            opacity: self.alpha_layer(),
            quality: if self.state.image_smoothing_enabled {
                self.state.image_smoothing_quality.to_engine()
            } else {
                ImageQuality::None
            },
            ..Paint::default()
        }
    }

    /// Allocates a transparent-black pixel block.
    pub fn create_image_data(&self, width: u32, height: u32) -> Result<ImageData, CanvasError> {
        ImageData::new(width, height)
    }

    /// Reads back a device-space block of pixels, or `None` when the
    /// engine has no pixel readback or the request is out of bounds.
    pub fn get_image_data(&mut self, x: i32, y: i32, width: u32, height: u32) -> Option<ImageData> {
        let pixels = self.surface.canvas().read_pixels(x, y, width, height)?;
        ImageData::with_data(pixels, width, Some(height)).ok()
    }

    /// Writes a pixel block at `(x, y)` in device space.
    pub fn put_image_data(&mut self, data: &ImageData, x: f64, y: f64) {
        if !all_finite(&[x, y]) {
            return;
        }
        self.blit_image_data(data, x, y, 0.0, 0.0, f64::from(data.width), f64::from(data.height));
    }

    /// Writes the dirty sub-rectangle of a pixel block at `(x, y)` in
    /// device space, after normalizing negative extents and clamping the
    /// origin, per the canvas `putImageData` rules.
    pub fn put_image_data_dirty(
        &mut self,
        data: &ImageData,
        x: f64,
        y: f64,
        dirty_x: f64,
        dirty_y: f64,
        dirty_width: f64,
        dirty_height: f64,
    ) {
        if !all_finite(&[x, y, dirty_x, dirty_y, dirty_width, dirty_height]) {
            return;
        }
        let (mut dx, mut dy, mut dw, mut dh) = (dirty_x, dirty_y, dirty_width, dirty_height);
        if dw < 0.0 {
            dx += dw;
            dw = dw.abs();
        }
        if dh < 0.0 {
            dy += dh;
            dh = dh.abs();
        }
        if dx < 0.0 {
            dw += dx;
            dx = 0.0;
        }
        if dy < 0.0 {
            dh += dy;
            dy = 0.0;
        }
        if dw <= 0.0 || dh <= 0.0 {
            return;
        }
        self.blit_image_data(data, x, y, dx, dy, dw, dh);
    }

    fn blit_image_data(&mut self, data: &ImageData, x: f64, y: f64, dx: f64, dy: f64, dw: f64, dh: f64) {
        let Some(image) = Image::from_rgba8(&data.data, data.width, data.height) else {
            return;
        };
        // putImageData operates in device space: unwind the transform
        // around the draw.
        let Some(inverse) = m33::invert(&self.transform) else {
            return;
        };
        let paint = Paint {
            quality: ImageQuality::None,
            ..Paint::default()
        };
        let canvas = self.surface.canvas();
        canvas.save();
        canvas.concat(&inverse);
        canvas.draw_image_rect(
            &image,
            Rect::new(dx, dy, dx + dw, dy + dh),
            Rect::new(x + dx, y + dy, x + dx + dw, y + dy + dh),
            &paint,
        );
        canvas.restore();
    }

    // --- Gradients ---------------------------------------------------------

    /// Creates a linear gradient between two points.
    pub fn create_linear_gradient(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> LinearGradient {
        LinearGradient::new(x0, y0, x1, y1)
    }

    /// Creates a radial gradient between two circles.
    pub fn create_radial_gradient(
        &self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> RadialGradient {
        RadialGradient::new(x0, y0, r0, x1, y1, r1)
    }

    // --- Host-only features (harmless no-ops) -------------------------------

    /// Hit regions are not supported; present for feature detection.
    pub fn add_hit_region(&mut self) {}

    /// Hit regions are not supported; present for feature detection.
    pub fn clear_hit_regions(&mut self) {}

    /// Hit regions are not supported; present for feature detection.
    pub fn remove_hit_region(&mut self) {}

    /// Focus rings are not supported; present for feature detection.
    pub fn draw_focus_if_needed(&mut self) {}

    /// Scrolling is not supported; present for feature detection.
    pub fn scroll_path_into_view(&mut self) {}
}
