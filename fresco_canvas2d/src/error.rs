// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hard-failure error class.
//!
//! Most invalid input to a canvas context is silently ignored (non-finite
//! coordinates, bad line widths, unknown color strings). The cases below are
//! the ones the canvas specification requires to fail loudly.

/// Errors raised by canvas operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    /// A negative radius was passed to `arc`, `arc_to`, or `ellipse`.
    #[error("radii cannot be negative")]
    NegativeRadius,
    /// A gradient color stop offset was non-finite or outside `[0, 1]`.
    #[error("offset must be between 0 and 1 inclusively")]
    InvalidColorStop,
    /// Image data dimensions were zero.
    #[error("invalid dimensions, width and height must be non-zero")]
    InvalidDimensions,
    /// An image data buffer did not match its stated dimensions.
    #[error("image data bytes must be a multiple of 4 and divide evenly by the width")]
    InvalidImageData,
}
