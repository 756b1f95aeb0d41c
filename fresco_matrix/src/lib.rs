// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fresco Matrix: flat-array matrix helpers for 2D and camera-style transforms.
//!
//! Matrices are plain row-major arrays with no object identity and no shared
//! mutable state: [`Matrix33`] is `[f64; 9]`, [`Matrix44`] is `[f64; 16]`.
//! Every function here is pure; nothing allocates.
//!
//! The 3x3 helpers in [`m33`] cover the transforms a 2D drawing context
//! needs (translate/scale/skew/rotate about a pivot, chain multiplication,
//! inversion, projective point mapping). The 4x4 helpers in [`m44`] add
//! camera-style construction ([`m44::lookat`], [`m44::perspective`],
//! [`m44::setup_camera`]) for 3D-ish canvas effects; they are pure
//! compositions of the same building blocks.
//!
//! Inversion reports a near-singular matrix by returning `None` rather than
//! panicking: a degenerate transform (e.g. a scale by zero) is a legitimate
//! runtime state that callers are expected to branch on.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod m33;
pub mod m44;

/// A row-major 3x3 matrix as a flat array.
///
/// Layout: `[m00, m01, m02, m10, m11, m12, m20, m21, m22]`, so an affine
/// 2D transform stores its translation in indices 2 and 5 and keeps
/// `[0, 0, 1]` as the bottom row.
pub type Matrix33 = [f64; 9];

/// A row-major 4x4 matrix as a flat array.
pub type Matrix44 = [f64; 16];

/// A 3-component vector used by the camera helpers.
pub type Vec3 = [f64; 3];

/// Determinants smaller than this (in absolute value) are treated as
/// singular by [`m33::invert`] and [`m44::invert`].
pub const SINGULAR_EPSILON: f64 = 1e-12;
