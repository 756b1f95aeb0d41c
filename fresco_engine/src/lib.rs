// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fresco Engine: the capability set a raster engine offers to the canvas
//! emulation layer.
//!
//! This crate sits between the Canvas-2D-compatible context in
//! `fresco_canvas2d` and concrete renderers. It defines:
//!
//! - [`Path`]: a concrete immediate-mode path primitive (move/line/quad/
//!   cubic verbs, tangent and oval arcs, winding queries, stroke outlines)
//!   built on [`kurbo::BezPath`],
//! - [`Paint`]: plain-data paint configuration (brush, stroke parameters
//!   including dashes, blend mode, optional mask blur),
//! - the backend traits [`Canvas`], [`Surface`], and the optional
//!   [`TextCanvas`] capability,
//! - [`EngineCaps`]: feature flags a backend reports so that callers can
//!   branch on capability presence instead of probing for methods.
//!
//! Engines are immediate-mode and synchronous: every call completes before
//! the next one is issued, and nothing here blocks or suspends. Resources
//! ([`Path`], [`Paint`], [`Image`]) are plain owned data; dropping them is
//! the single release point.
//!
//! Two backends ship in this workspace: `fresco_engine_ref` (a recording
//! backend for tests and debugging) and `fresco_engine_vello_cpu` (a
//! software rasterizer).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;

use fresco_matrix::{Matrix33, m33};
use kurbo::Rect;

mod paint;
mod path;

pub use paint::{FontSpec, FontStyle, Image, ImageInfo, ImageQuality, Paint, PaintStyle};
pub use path::{ARC_TOLERANCE, Path};

// Engine-native color and brush types are peniko's.
pub use peniko::{BlendMode, Brush, Color, Compose, Fill as FillRule, Mix};

bitflags::bitflags! {
    /// Optional features a backend supports.
    ///
    /// A build or runtime configuration decides which capabilities a
    /// surface carries; callers query these flags (or [`Canvas::text`])
    /// rather than relying on a method being present.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct EngineCaps: u32 {
        /// Image drawing ([`Canvas::draw_image_rect`]) is implemented.
        const IMAGES = 1 << 0;
        /// Pixel readback ([`Canvas::read_pixels`]) is implemented.
        const PIXEL_READBACK = 1 << 1;
        /// Text drawing and measurement are available via [`Canvas::text`].
        const TEXT = 1 << 2;
        /// The surface rasterizes on a GPU.
        const GPU = 1 << 3;
    }
}

/// An immediate-mode drawing target.
///
/// The canvas owns the current transform and the clip; `save`/`restore`
/// snapshot and reinstate both. All geometry passed in is in user space and
/// is mapped through the current transform at draw time.
pub trait Canvas {
    /// Pushes the current transform and clip onto the canvas's own stack.
    fn save(&mut self);

    /// Pops the most recent [`Canvas::save`]. A no-op if the stack is empty.
    fn restore(&mut self);

    /// Post-multiplies the current transform by `matrix`.
    fn concat(&mut self, matrix: &Matrix33);

    /// Returns the current transform.
    fn total_matrix(&self) -> Matrix33;

    /// Replaces the current transform with `matrix`.
    ///
    /// The default implementation concatenates the inverse of the current
    /// transform followed by `matrix`; backends that store the transform
    /// directly should override it.
    fn set_matrix(&mut self, matrix: &Matrix33) {
        if let Some(inverse) = m33::invert(&self.total_matrix()) {
            self.concat(&inverse);
        }
        self.concat(matrix);
    }

    /// Translates the current transform.
    fn translate(&mut self, dx: f64, dy: f64) {
        self.concat(&m33::translated(dx, dy));
    }

    /// Scales the current transform about the origin.
    fn scale(&mut self, sx: f64, sy: f64) {
        self.concat(&m33::scaled(sx, sy, 0.0, 0.0));
    }

    /// Rotates the current transform about `(px, py)`.
    fn rotate(&mut self, radians: f64, px: f64, py: f64) {
        self.concat(&m33::rotated(radians, px, py));
    }

    /// Skews the current transform about the origin.
    fn skew(&mut self, kx: f64, ky: f64) {
        self.concat(&m33::skewed(kx, ky, 0.0, 0.0));
    }

    /// Fills the whole surface with `color`, ignoring the transform.
    fn clear(&mut self, color: Color);

    /// Draws `path` with `paint` under the current transform and clip.
    fn draw_path(&mut self, path: &Path, paint: &Paint);

    /// Draws an axis-aligned rectangle with `paint`.
    fn draw_rect(&mut self, rect: Rect, paint: &Paint);

    /// Intersects the clip with the fill region of `path` (honoring the
    /// path's fill rule). Undone by [`Canvas::restore`].
    fn clip_path(&mut self, path: &Path);

    /// Draws the `src` rectangle of `image` into the `dst` rectangle.
    ///
    /// Backends without [`EngineCaps::IMAGES`] ignore this call.
    fn draw_image_rect(&mut self, image: &Image, src: Rect, dst: Rect, paint: &Paint);

    /// Reads back an RGBA8 (unpremultiplied) block of pixels in device
    /// space, or `None` if the request is out of bounds or the backend has
    /// no [`EngineCaps::PIXEL_READBACK`].
    fn read_pixels(&mut self, x: i32, y: i32, width: u32, height: u32) -> Option<Vec<u8>>;

    /// The capabilities this canvas supports.
    fn capabilities(&self) -> EngineCaps;

    /// The text capability, if this canvas has one.
    fn text(&mut self) -> Option<&mut dyn TextCanvas> {
        None
    }
}

/// Optional text drawing capability.
///
/// Shaping and font loading are the engine's concern; the emulation layer
/// only hands over the resolved [`FontSpec`].
pub trait TextCanvas {
    /// Draws `text` with its baseline origin at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, font: &FontSpec, paint: &Paint);

    /// Returns the advance width of `text` in user-space units.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64;
}

/// A raster target owning one [`Canvas`].
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// The canvas drawing into this surface.
    fn canvas(&mut self) -> &mut dyn Canvas;

    /// Completes any pending rendering.
    fn flush(&mut self);

    /// Flushes and returns the current contents as an image.
    fn make_image_snapshot(&mut self) -> Image;
}
