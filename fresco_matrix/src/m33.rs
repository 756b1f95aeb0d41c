// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 3x3 matrix construction, multiplication, inversion, and point mapping.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::{Matrix33, SINGULAR_EPSILON};

/// The identity matrix.
#[inline]
pub const fn identity() -> Matrix33 {
    [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
}

/// A translation by `(dx, dy)`.
#[inline]
pub const fn translated(dx: f64, dy: f64) -> Matrix33 {
    [1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0]
}

/// A scale by `(sx, sy)` about the pivot `(px, py)`.
///
/// Pass `(0.0, 0.0)` for a scale about the origin.
#[inline]
pub const fn scaled(sx: f64, sy: f64, px: f64, py: f64) -> Matrix33 {
    [sx, 0.0, px - sx * px, 0.0, sy, py - sy * py, 0.0, 0.0, 1.0]
}

/// A skew by `(kx, ky)` about the pivot `(px, py)`.
#[inline]
pub const fn skewed(kx: f64, ky: f64, px: f64, py: f64) -> Matrix33 {
    [1.0, kx, -kx * py, ky, 1.0, -ky * px, 0.0, 0.0, 1.0]
}

/// A rotation by `radians` about the pivot `(px, py)`.
///
/// Pass `(0.0, 0.0)` for a rotation about the origin. Positive angles
/// rotate clockwise in the y-down coordinate system used by canvases.
#[inline]
pub fn rotated(radians: f64, px: f64, py: f64) -> Matrix33 {
    let s = radians.sin();
    let c = radians.cos();
    [
        c,
        -s,
        s * py + (1.0 - c) * px,
        s,
        c,
        -s * px + (1.0 - c) * py,
        0.0,
        0.0,
        1.0,
    ]
}

/// The product `a * b` of two matrices.
#[inline]
pub fn mul(a: &Matrix33, b: &Matrix33) -> Matrix33 {
    let mut out = [0.0; 9];
    for r in 0..3 {
        for c in 0..3 {
            out[r * 3 + c] =
                a[r * 3] * b[c] + a[r * 3 + 1] * b[3 + c] + a[r * 3 + 2] * b[6 + c];
        }
    }
    out
}

/// Multiplies a chain of matrices left to right: the first element is the
/// leftmost factor, so `multiply(&[a, b, c])` is `a * b * c`.
///
/// An empty slice yields the identity.
pub fn multiply(matrices: &[Matrix33]) -> Matrix33 {
    let mut out = identity();
    for m in matrices {
        out = mul(&out, m);
    }
    out
}

/// Inverts a matrix, or returns `None` if the determinant is ~zero.
///
/// A `None` here is an expected outcome for degenerate transforms (such as
/// a scale by zero), not an error.
pub fn invert(m: &Matrix33) -> Option<Matrix33> {
    let det = m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
        + m[2] * (m[3] * m[7] - m[4] * m[6]);
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    Some([
        (m[4] * m[8] - m[5] * m[7]) * inv_det,
        (m[2] * m[7] - m[1] * m[8]) * inv_det,
        (m[1] * m[5] - m[2] * m[4]) * inv_det,
        (m[5] * m[6] - m[3] * m[8]) * inv_det,
        (m[0] * m[8] - m[2] * m[6]) * inv_det,
        (m[2] * m[3] - m[0] * m[5]) * inv_det,
        (m[3] * m[7] - m[4] * m[6]) * inv_det,
        (m[1] * m[6] - m[0] * m[7]) * inv_det,
        (m[0] * m[4] - m[1] * m[3]) * inv_det,
    ])
}

/// Maps a flat `[x0, y0, x1, y1, ...]` point array through the matrix in
/// place, applying the full projective mapping (dividing by the homogeneous
/// term), and returns the same slice.
pub fn map_points<'a>(m: &Matrix33, points: &'a mut [f64]) -> &'a mut [f64] {
    for i in (0..points.len().saturating_sub(1)).step_by(2) {
        let x = points[i];
        let y = points[i + 1];
        let denom = m[6] * x + m[7] * y + m[8];
        points[i] = (m[0] * x + m[1] * y + m[2]) / denom;
        points[i + 1] = (m[3] * x + m[4] * y + m[5]) / denom;
    }
    points
}

/// Maps a single point through the matrix.
#[inline]
pub fn map_point(m: &Matrix33, x: f64, y: f64) -> (f64, f64) {
    let denom = m[6] * x + m[7] * y + m[8];
    (
        (m[0] * x + m[1] * y + m[2]) / denom,
        (m[3] * x + m[4] * y + m[5]) / denom,
    )
}

/// Returns true if every element of `a` is within `tolerance` of `b`.
pub fn nearly_equal(a: &Matrix33, b: &Matrix33, tolerance: f64) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_is_left_to_right() {
        let t = translated(10.0, 0.0);
        let s = scaled(2.0, 2.0, 0.0, 0.0);
        // Translate-then-scale differs from scale-then-translate; the first
        // argument must be the leftmost factor.
        let ts = multiply(&[t, s]);
        assert_eq!(map_point(&ts, 1.0, 0.0), (12.0, 0.0));
        let st = multiply(&[s, t]);
        assert_eq!(map_point(&st, 1.0, 0.0), (22.0, 0.0));
    }

    #[test]
    fn invert_round_trips() {
        let m = multiply(&[
            translated(-40.0, 120.0),
            rotated(0.3, 7.0, -2.0),
            scaled(2.0, 2.5, 0.0, 0.0),
            skewed(-0.5, 0.2, 1.0, 1.0),
        ]);
        let inv = invert(&m).expect("matrix should be invertible");
        let round = mul(&m, &inv);
        assert!(
            nearly_equal(&round, &identity(), 1e-10),
            "m * invert(m) should be the identity, got {round:?}"
        );
    }

    #[test]
    fn invert_reports_singular() {
        assert!(invert(&scaled(0.0, 1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn rotation_about_pivot_fixes_pivot() {
        let m = rotated(1.234, 50.0, -7.0);
        let (x, y) = map_point(&m, 50.0, -7.0);
        assert!((x - 50.0).abs() < 1e-12 && (y + 7.0).abs() < 1e-12);
    }

    #[test]
    fn map_points_divides_by_homogeneous_term() {
        // A projective matrix with a non-trivial bottom row.
        let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0];
        let mut pts = [4.0, 6.0];
        map_points(&m, &mut pts);
        assert_eq!(pts, [2.0, 3.0]);
    }

    #[test]
    fn map_points_handles_many_pairs_in_place() {
        let m = translated(1.0, -1.0);
        let mut pts = [0.0, 0.0, 2.0, 3.0, -5.0, 5.0];
        map_points(&m, &mut pts);
        assert_eq!(pts, [1.0, -1.0, 3.0, 2.0, -4.0, 4.0]);
    }
}
