// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fresco Canvas 2D: an HTML-Canvas-compatible drawing context emulated on
//! the Fresco engine capability set.
//!
//! The engine primitives ([`fresco_engine::Path`], paints, the canvas
//! transform stack) have different defaults, different path-building rules,
//! and no implicit state stack of their own. This crate reproduces the
//! exact state-machine semantics of `CanvasRenderingContext2D` on top of
//! them:
//!
//! - path construction with implicit moves, finiteness guards, degenerate
//!   close suppression, and ellipse-sweep canonicalization,
//! - the transform stack, with in-progress path points re-expressed when
//!   the user space changes,
//! - style state (colors, gradients, dashes, shadows, composite modes,
//!   fonts) with the canvas's permissive error model,
//! - `save`/`restore` snapshots deep enough that later mutation never
//!   leaks into a snapshot.
//!
//! # Example
//!
//! ```
//! use fresco_canvas2d::CanvasElement;
//! use fresco_engine_ref::RefSurface;
//!
//! let mut element = CanvasElement::new(RefSurface::new(256, 256));
//! let ctx = element.get_context_2d();
//! ctx.set_fill_style("rebeccapurple");
//! ctx.begin_path();
//! ctx.arc(128.0, 128.0, 64.0, 0.0, std::f64::consts::TAU, false).unwrap();
//! ctx.fill();
//! ```
//!
//! Everything here is single-threaded and synchronous: a method call runs
//! to completion before the next one is processed, and nothing blocks.

mod context;
mod error;
mod font;
mod image_data;
mod state;
mod style;

pub use context::Context2d;
pub use error::CanvasError;
pub use font::{DEFAULT_FONT_HEIGHT, parse_font};
pub use image_data::ImageData;
pub use state::SmoothingQuality;
pub use style::{FillStyle, GradientStops, LinearGradient, RadialGradient};

use fresco_engine::{Image, Surface};

/// Text measurement results.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the measured text, in user-space units.
    pub width: f64,
}

/// The `<canvas>`-shaped entry point: a surface plus its 2D context.
///
/// Engine resources are plain owned data; dropping the element releases
/// everything it created, exactly once.
#[derive(Debug)]
pub struct CanvasElement<S: Surface> {
    context: Context2d<S>,
}

impl<S: Surface> CanvasElement<S> {
    /// Wraps a surface.
    pub fn new(surface: S) -> Self {
        Self {
            context: Context2d::new(surface),
        }
    }

    /// Width of the backing surface in pixels.
    pub fn width(&self) -> u32 {
        self.context.surface().width()
    }

    /// Height of the backing surface in pixels.
    pub fn height(&self) -> u32 {
        self.context.surface().height()
    }

    /// The 2D drawing context.
    ///
    /// Mirrors `canvas.getContext('2d')`; there is only the one context
    /// kind, so this cannot fail.
    pub fn get_context_2d(&mut self) -> &mut Context2d<S> {
        &mut self.context
    }

    /// Flushes pending drawing and snapshots the surface contents.
    ///
    /// Encoding the image (e.g. to PNG) is the caller's concern.
    pub fn to_image(&mut self) -> Image {
        self.context.surface_mut().make_image_snapshot()
    }
}
