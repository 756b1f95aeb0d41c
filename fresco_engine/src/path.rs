// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine's immediate-mode path primitive.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use core::f64::consts::PI;

use fresco_matrix::{Matrix33, m33};
use kurbo::{Arc, BezPath, PathEl, Point, Rect, Shape as _, Stroke, StrokeOpts, Vec2, stroke};

use crate::FillRule;

/// User-space tolerance for flattening arcs into cubic Béziers.
pub const ARC_TOLERANCE: f64 = 1e-3;

/// A sequence of subpaths under construction.
///
/// Verbs follow Skia's conventions rather than the HTML canvas ones; the
/// emulation layer in `fresco_canvas2d` is responsible for the canvas-side
/// rules (implicit moves, argument validation, angle canonicalization):
///
/// - A line/curve verb on an empty path injects a move to the origin.
/// - A verb following [`Path::close`] begins a new subpath at the closed
///   contour's start point.
/// - [`Path::oval_arc_to`] reduces its sweep modulo 360 degrees, so a
///   full-revolution sweep degenerates to nothing; callers that need a
///   full oval must split the sweep themselves.
#[derive(Clone, Debug)]
pub struct Path {
    bez: BezPath,
    fill_rule: FillRule,
    /// Start of the current subpath.
    start: Option<Point>,
    /// Most recently placed point.
    last: Option<Point>,
    /// Whether the last verb was a close.
    closed: bool,
}

impl Default for Path {
    fn default() -> Self {
        Self {
            bez: BezPath::new(),
            fill_rule: FillRule::NonZero,
            start: None,
            last: None,
            closed: false,
        }
    }
}

impl Path {
    /// Creates an empty path with a non-zero fill rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no verb has been recorded.
    pub fn is_empty(&self) -> bool {
        self.bez.elements().is_empty()
    }

    /// The recorded path elements.
    pub fn elements(&self) -> &[PathEl] {
        self.bez.elements()
    }

    /// The underlying Bézier path.
    pub fn bez_path(&self) -> &BezPath {
        &self.bez
    }

    /// The most recently placed point, if any.
    pub fn last_point(&self) -> Option<Point> {
        self.last
    }

    /// The fill rule used by [`Path::contains`] and by clipping.
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Sets the fill rule.
    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
    }

    /// Begins a new subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f64, y: f64) {
        let p = Point::new(x, y);
        self.bez.move_to(p);
        self.start = Some(p);
        self.last = Some(p);
        self.closed = false;
    }

    /// Adds a line from the current point to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.ensure_move();
        let p = Point::new(x, y);
        self.bez.line_to(p);
        self.last = Some(p);
    }

    /// Adds a quadratic Bézier with control `(x1, y1)` ending at `(x, y)`.
    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.ensure_move();
        let p = Point::new(x, y);
        self.bez.quad_to(Point::new(x1, y1), p);
        self.last = Some(p);
    }

    /// Adds a cubic Bézier with controls `(x1, y1)`/`(x2, y2)` ending at
    /// `(x, y)`.
    pub fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.ensure_move();
        let p = Point::new(x, y);
        self.bez.curve_to(Point::new(x1, y1), Point::new(x2, y2), p);
        self.last = Some(p);
    }

    /// Closes the current subpath. A no-op on an empty path.
    ///
    /// The next line/curve verb will begin a new subpath at the closed
    /// contour's start point.
    pub fn close(&mut self) {
        if self.is_empty() {
            return;
        }
        self.bez.close_path();
        self.last = self.start;
        self.closed = true;
    }

    /// Adds a closed rectangle as its own subpath (clockwise winding).
    pub fn add_rect(&mut self, rect: Rect) {
        self.move_to(rect.x0, rect.y0);
        self.line_to(rect.x1, rect.y0);
        self.line_to(rect.x1, rect.y1);
        self.line_to(rect.x0, rect.y1);
        self.close();
    }

    /// Adds a circular arc of the given radius from the current point
    /// toward `(x1, y1)` and on toward `(x2, y2)`, tangent to both lines.
    ///
    /// Degenerate configurations (zero radius, coincident or collinear
    /// points) reduce to a line to `(x1, y1)`.
    pub fn tangent_arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        self.ensure_move();
        let p0 = self.last.expect("ensure_move placed a point");
        let p1 = Point::new(x1, y1);
        let p2 = Point::new(x2, y2);
        let v1 = p0 - p1;
        let v2 = p2 - p1;
        let cross = v1.cross(v2);
        if radius == 0.0 || v1.hypot() == 0.0 || v2.hypot() == 0.0 || cross.abs() < 1e-12 {
            self.line_to(x1, y1);
            return;
        }

        let u1 = v1 / v1.hypot();
        let u2 = v2 / v2.hypot();
        let angle = u1.dot(u2).clamp(-1.0, 1.0).acos();
        let tangent_dist = radius / (angle / 2.0).tan();
        let t1 = p1 + u1 * tangent_dist;
        let t2 = p1 + u2 * tangent_dist;
        let bisector = u1 + u2;
        let center = p1 + bisector * (radius / (angle / 2.0).sin() / bisector.hypot());

        self.line_to(t1.x, t1.y);
        let start_angle = (t1 - center).atan2();
        let end_angle = (t2 - center).atan2();
        // The tangent arc is always the minor arc (|sweep| = pi - angle).
        let mut sweep = end_angle - start_angle;
        if sweep > PI {
            sweep -= 2.0 * PI;
        } else if sweep < -PI {
            sweep += 2.0 * PI;
        }
        let arc = Arc::new(center, Vec2::new(radius, radius), start_angle, sweep, 0.0);
        for el in arc.append_iter(ARC_TOLERANCE) {
            self.bez.push(el);
        }
        self.last = Some(t2);
        self.closed = false;
    }

    /// Adds an arc along the axis-aligned oval inscribed in `oval`,
    /// starting at `start_deg` and sweeping by `sweep_deg` (degrees,
    /// clockwise positive in the y-down coordinate system).
    ///
    /// Unless `force_move` is set or the path is empty, a line connects the
    /// current point to the arc's start. The sweep is reduced modulo 360:
    /// an exact full revolution contributes no arc segments at all, only
    /// the positioning move/line.
    pub fn oval_arc_to(&mut self, oval: Rect, start_deg: f64, sweep_deg: f64, force_move: bool) {
        let center = oval.center();
        let rx = oval.width() / 2.0;
        let ry = oval.height() / 2.0;
        let start = start_deg.to_radians();
        let sweep = (sweep_deg % 360.0).to_radians();

        let start_pt = Point::new(center.x + start.cos() * rx, center.y + start.sin() * ry);
        if force_move || self.is_empty() {
            self.move_to(start_pt.x, start_pt.y);
        } else if self.last != Some(start_pt) {
            self.line_to(start_pt.x, start_pt.y);
        }
        if sweep == 0.0 {
            return;
        }

        let arc = Arc::new(center, Vec2::new(rx, ry), start, sweep, 0.0);
        for el in arc.append_iter(ARC_TOLERANCE) {
            self.bez.push(el);
        }
        let end = start + sweep;
        self.last = Some(Point::new(center.x + end.cos() * rx, center.y + end.sin() * ry));
        self.closed = false;
    }

    /// Maps every control point through `matrix` (projective divide
    /// included).
    pub fn transform(&mut self, matrix: &Matrix33) {
        let map = |p: Point| -> Point {
            let (x, y) = m33::map_point(matrix, p.x, p.y);
            Point::new(x, y)
        };
        let mut mapped = BezPath::new();
        for el in self.bez.elements() {
            mapped.push(match *el {
                PathEl::MoveTo(p) => PathEl::MoveTo(map(p)),
                PathEl::LineTo(p) => PathEl::LineTo(map(p)),
                PathEl::QuadTo(p1, p) => PathEl::QuadTo(map(p1), map(p)),
                PathEl::CurveTo(p1, p2, p) => PathEl::CurveTo(map(p1), map(p2), map(p)),
                PathEl::ClosePath => PathEl::ClosePath,
            });
        }
        self.bez = mapped;
        self.start = self.start.map(map);
        self.last = self.last.map(map);
    }

    /// The bounding box of the path, or a zero rect for an empty path.
    pub fn bounds(&self) -> Rect {
        if self.is_empty() {
            return Rect::ZERO;
        }
        self.bez.bounding_box()
    }

    /// Point-in-path test under the path's fill rule.
    ///
    /// Open subpaths are treated as implicitly closed, matching how fills
    /// and hit tests interpret them.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let winding = self.closed_copy().winding(Point::new(x, y));
        match self.fill_rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }

    /// The filled outline of this path stroked with `style` (dashes
    /// included), as a new path.
    pub fn stroke_outline(&self, style: &Stroke, tolerance: f64) -> Self {
        let outline = stroke(self.bez.iter(), style, &StrokeOpts::default(), tolerance);
        Self {
            bez: outline,
            fill_rule: FillRule::NonZero,
            start: None,
            last: None,
            closed: false,
        }
    }

    /// Begins a subpath if a verb needs one: on an empty path at the
    /// origin, after a close at the closed contour's start.
    fn ensure_move(&mut self) {
        if self.is_empty() {
            self.move_to(0.0, 0.0);
        } else if self.closed {
            let start = self.start.unwrap_or(Point::ZERO);
            self.move_to(start.x, start.y);
        }
    }

    /// A copy with every open subpath explicitly closed.
    fn closed_copy(&self) -> BezPath {
        let mut out = BezPath::new();
        let mut open = false;
        for el in self.bez.elements() {
            if let PathEl::MoveTo(_) = el {
                if open {
                    out.push(PathEl::ClosePath);
                }
                open = true;
            }
            out.push(*el);
            if let PathEl::ClosePath = el {
                open = false;
            }
        }
        if open {
            out.push(PathEl::ClosePath);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_on_empty_path_starts_at_origin() {
        let mut path = Path::new();
        path.line_to(10.0, 0.0);
        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(Point::ZERO), PathEl::LineTo(Point::new(10.0, 0.0))]
        );
    }

    #[test]
    fn verb_after_close_restarts_at_contour_start() {
        let mut path = Path::new();
        path.move_to(5.0, 5.0);
        path.line_to(10.0, 5.0);
        path.line_to(10.0, 10.0);
        path.close();
        path.line_to(20.0, 20.0);
        let elements = path.elements();
        assert_eq!(elements[4], PathEl::MoveTo(Point::new(5.0, 5.0)));
        assert_eq!(elements[5], PathEl::LineTo(Point::new(20.0, 20.0)));
    }

    #[test]
    fn full_sweep_oval_arc_degenerates() {
        let mut path = Path::new();
        let oval = Rect::new(-10.0, -10.0, 10.0, 10.0);
        path.oval_arc_to(oval, 0.0, 360.0, false);
        // Only the positioning move survives; no arc segments.
        assert_eq!(path.elements(), &[PathEl::MoveTo(Point::new(10.0, 0.0))]);

        let mut path = Path::new();
        path.oval_arc_to(oval, 0.0, -360.0, false);
        assert_eq!(path.elements().len(), 1);
    }

    #[test]
    fn half_sweeps_meet_where_they_started() {
        let mut path = Path::new();
        let oval = Rect::new(0.0, 0.0, 20.0, 20.0);
        path.oval_arc_to(oval, 0.0, 180.0, false);
        path.oval_arc_to(oval, 180.0, 180.0, false);
        let first = match path.elements()[0] {
            PathEl::MoveTo(p) => p,
            ref other => panic!("expected leading move, got {other:?}"),
        };
        let last = path.last_point().expect("arc placed points");
        assert!((first - last).hypot() < 1e-9, "full circle should close seamlessly");
        // Two half sweeps produce curve segments, unlike a single 360 call.
        assert!(path.elements().len() > 2);
    }

    #[test]
    fn oval_arc_connects_with_line_when_continuing() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.oval_arc_to(Rect::new(40.0, 40.0, 60.0, 60.0), 0.0, 90.0, false);
        assert_eq!(path.elements()[1], PathEl::LineTo(Point::new(60.0, 50.0)));
    }

    #[test]
    fn tangent_arc_degenerates_to_line_when_collinear() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.tangent_arc_to(10.0, 0.0, 20.0, 0.0, 5.0);
        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(Point::ZERO), PathEl::LineTo(Point::new(10.0, 0.0))]
        );
    }

    #[test]
    fn tangent_arc_touches_both_tangent_lines() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        // Right-angle corner at (10, 0) turning down to (10, 10), radius 4:
        // tangent points are (6, 0) and (10, 4).
        path.tangent_arc_to(10.0, 0.0, 10.0, 10.0, 4.0);
        assert_eq!(path.elements()[1], PathEl::LineTo(Point::new(6.0, 0.0)));
        let end = path.last_point().expect("arc placed points");
        assert!((end.x - 10.0).abs() < 1e-9 && (end.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn contains_honors_fill_rule() {
        let mut path = Path::new();
        path.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        path.add_rect(Rect::new(2.0, 2.0, 8.0, 8.0));
        // Same winding direction: non-zero keeps the middle filled,
        // even-odd carves it out.
        assert!(path.contains(5.0, 5.0));
        path.set_fill_rule(FillRule::EvenOdd);
        assert!(!path.contains(5.0, 5.0));
        assert!(path.contains(1.0, 5.0));
    }

    #[test]
    fn contains_closes_open_subpaths() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.line_to(0.0, 10.0);
        // No explicit close; the interior still hits.
        assert!(path.contains(5.0, 5.0));
        assert!(!path.contains(15.0, 5.0));
    }

    #[test]
    fn transform_maps_all_points() {
        let mut path = Path::new();
        path.move_to(1.0, 2.0);
        path.line_to(3.0, 4.0);
        path.transform(&m33::translated(10.0, 20.0));
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(11.0, 22.0)),
                PathEl::LineTo(Point::new(13.0, 24.0))
            ]
        );
        assert_eq!(path.last_point(), Some(Point::new(13.0, 24.0)));
    }

    #[test]
    fn stroke_outline_covers_the_centerline_band() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        let outline = path.stroke_outline(&Stroke::new(4.0), 0.01);
        assert!(outline.contains(5.0, 1.5));
        assert!(!outline.contains(5.0, 3.0));
    }

    #[test]
    fn bounds_of_empty_path_is_zero() {
        assert_eq!(Path::new().bounds(), Rect::ZERO);
    }
}
