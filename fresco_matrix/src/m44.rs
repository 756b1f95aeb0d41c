// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 4x4 matrix helpers, including camera-style construction.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::{Matrix33, Matrix44, SINGULAR_EPSILON, Vec3};

/// The identity matrix.
#[inline]
pub const fn identity() -> Matrix44 {
    [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]
}

/// A translation by the vector `v`.
#[inline]
pub const fn translated(v: Vec3) -> Matrix44 {
    [
        1.0, 0.0, 0.0, v[0], //
        0.0, 1.0, 0.0, v[1], //
        0.0, 0.0, 1.0, v[2], //
        0.0, 0.0, 0.0, 1.0,
    ]
}

/// A scale by the vector `v` about the origin.
#[inline]
pub const fn scaled(v: Vec3) -> Matrix44 {
    [
        v[0], 0.0, 0.0, 0.0, //
        0.0, v[1], 0.0, 0.0, //
        0.0, 0.0, v[2], 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]
}

/// A rotation by `radians` about `axis`.
///
/// The axis does not need to be normalized.
#[inline]
pub fn rotated(axis: Vec3, radians: f64) -> Matrix44 {
    rotated_unit_sin_cos(normalize(axis), radians.sin(), radians.cos())
}

/// A rotation about the *unit* vector `axis` by an angle given as its sine
/// and cosine.
pub fn rotated_unit_sin_cos(axis: Vec3, sin_angle: f64, cos_angle: f64) -> Matrix44 {
    let [x, y, z] = axis;
    let c = cos_angle;
    let s = sin_angle;
    let t = 1.0 - c;
    [
        t * x * x + c,
        t * x * y - s * z,
        t * x * z + s * y,
        0.0,
        t * x * y + s * z,
        t * y * y + c,
        t * y * z - s * x,
        0.0,
        t * x * z - s * y,
        t * y * z + s * x,
        t * z * z + c,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ]
}

/// The product `a * b` of two matrices.
pub fn mul(a: &Matrix44, b: &Matrix44) -> Matrix44 {
    let mut out = [0.0; 16];
    for r in 0..4 {
        for c in 0..4 {
            let mut acc = 0.0;
            for k in 0..4 {
                acc += a[r * 4 + k] * b[k * 4 + c];
            }
            out[r * 4 + c] = acc;
        }
    }
    out
}

/// Multiplies a chain of matrices left to right; the first element is the
/// leftmost factor. An empty slice yields the identity.
pub fn multiply(matrices: &[Matrix44]) -> Matrix44 {
    let mut out = identity();
    for m in matrices {
        out = mul(&out, m);
    }
    out
}

/// The transpose of `m`.
pub fn transpose(m: &Matrix44) -> Matrix44 {
    let mut out = [0.0; 16];
    for r in 0..4 {
        for c in 0..4 {
            out[c * 4 + r] = m[r * 4 + c];
        }
    }
    out
}

/// Returns the element at row `r`, column `c`.
#[inline]
pub const fn rc(m: &Matrix44, r: usize, c: usize) -> f64 {
    m[r * 4 + c]
}

/// Inverts a matrix, or returns `None` if the determinant is ~zero.
pub fn invert(m: &Matrix44) -> Option<Matrix44> {
    let b00 = m[0] * m[5] - m[1] * m[4];
    let b01 = m[0] * m[6] - m[2] * m[4];
    let b02 = m[0] * m[7] - m[3] * m[4];
    let b03 = m[1] * m[6] - m[2] * m[5];
    let b04 = m[1] * m[7] - m[3] * m[5];
    let b05 = m[2] * m[7] - m[3] * m[6];
    let b06 = m[8] * m[13] - m[9] * m[12];
    let b07 = m[8] * m[14] - m[10] * m[12];
    let b08 = m[8] * m[15] - m[11] * m[12];
    let b09 = m[9] * m[14] - m[10] * m[13];
    let b10 = m[9] * m[15] - m[11] * m[13];
    let b11 = m[10] * m[15] - m[11] * m[14];

    let det = b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06;
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    Some([
        (m[5] * b11 - m[6] * b10 + m[7] * b09) * inv_det,
        (m[2] * b10 - m[1] * b11 - m[3] * b09) * inv_det,
        (m[13] * b05 - m[14] * b04 + m[15] * b03) * inv_det,
        (m[10] * b04 - m[9] * b05 - m[11] * b03) * inv_det,
        (m[6] * b08 - m[4] * b11 - m[7] * b07) * inv_det,
        (m[0] * b11 - m[2] * b08 + m[3] * b07) * inv_det,
        (m[14] * b02 - m[12] * b05 - m[15] * b01) * inv_det,
        (m[8] * b05 - m[10] * b02 + m[11] * b01) * inv_det,
        (m[4] * b10 - m[5] * b08 + m[7] * b06) * inv_det,
        (m[1] * b08 - m[0] * b10 - m[3] * b06) * inv_det,
        (m[12] * b04 - m[13] * b02 + m[15] * b00) * inv_det,
        (m[9] * b02 - m[8] * b04 - m[11] * b00) * inv_det,
        (m[5] * b07 - m[4] * b09 - m[6] * b06) * inv_det,
        (m[0] * b09 - m[1] * b07 + m[2] * b06) * inv_det,
        (m[13] * b01 - m[12] * b03 - m[14] * b00) * inv_det,
        (m[8] * b03 - m[9] * b01 + m[10] * b00) * inv_det,
    ])
}

/// A world-to-camera matrix looking from `eye` toward `center` with the
/// given approximate `up` direction.
///
/// Falls back to the identity if the implied camera frame is degenerate
/// (e.g. `eye == center`).
pub fn lookat(eye: Vec3, center: Vec3, up: Vec3) -> Matrix44 {
    let f = normalize(sub(center, eye));
    let u = normalize(up);
    let s = normalize(cross(f, u));

    // Camera-to-world: columns are the camera frame and the eye position.
    let mut m = identity();
    set_column(&mut m, 0, s);
    set_column(&mut m, 1, cross(s, f));
    set_column(&mut m, 2, mul_scalar(f, -1.0));
    set_column(&mut m, 3, eye);

    invert(&m).unwrap_or_else(identity)
}

/// A perspective projection with the given near/far planes and vertical
/// field of view in radians.
pub fn perspective(near: f64, far: f64, radians: f64) -> Matrix44 {
    let denom_inv = 1.0 / (far - near);
    let half_angle = radians / 2.0;
    let cot = half_angle.cos() / half_angle.sin();
    [
        cot,
        0.0,
        0.0,
        0.0,
        0.0,
        cot,
        0.0,
        0.0,
        0.0,
        0.0,
        (far + near) * denom_inv,
        2.0 * far * near * denom_inv,
        0.0,
        0.0,
        -1.0,
        0.0,
    ]
}

/// Camera parameters for [`setup_camera`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub eye: Vec3,
    /// Center of attention (what the eye looks at).
    pub coa: Vec3,
    /// Approximate up direction.
    pub up: Vec3,
    /// Near clipping plane distance.
    pub near: f64,
    /// Far clipping plane distance.
    pub far: f64,
    /// Vertical field of view in radians.
    pub angle: f64,
}

/// Composes a full camera transform for a viewport.
///
/// `area` is `[left, top, right, bottom]` in destination coordinates and
/// `z_scale` the depth scaling of the viewport box. Returns `None` when the
/// viewport is degenerate (zero area or zero depth).
pub fn setup_camera(area: [f64; 4], z_scale: f64, cam: &Camera) -> Option<Matrix44> {
    let camera = lookat(cam.eye, cam.coa, cam.up);
    let projection = perspective(cam.near, cam.far, cam.angle);
    let center = [(area[0] + area[2]) / 2.0, (area[1] + area[3]) / 2.0, 0.0];
    let view_scale = [(area[2] - area[0]) / 2.0, (area[3] - area[1]) / 2.0, z_scale];
    let viewport = mul(&translated(center), &scaled(view_scale));
    let viewport_inv = invert(&viewport)?;
    Some(multiply(&[viewport, projection, camera, viewport_inv]))
}

/// Drops a 4x4 matrix to the 3x3 transform of its x/y/w rows and columns.
///
/// This is the flattening a 2D canvas applies when concatenating a camera
/// matrix: the z row and column are discarded.
pub const fn to_matrix33(m: &Matrix44) -> Matrix33 {
    [m[0], m[1], m[3], m[4], m[5], m[7], m[12], m[13], m[15]]
}

#[inline]
fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn mul_scalar(v: Vec3, s: f64) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

#[inline]
fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn normalize(v: Vec3) -> Vec3 {
    let len = dot(v, v).sqrt();
    if len == 0.0 {
        return v;
    }
    mul_scalar(v, 1.0 / len)
}

#[inline]
fn set_column(m: &mut Matrix44, col: usize, v: Vec3) {
    m[col] = v[0];
    m[4 + col] = v[1];
    m[8 + col] = v[2];
}
