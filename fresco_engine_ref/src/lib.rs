// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fresco Engine Reference Backend.
//!
//! This crate provides a small, stateful implementation of the
//! [`Canvas`]/[`Surface`] capability set for **call recording and state
//! tracing**.
//!
//! It is intentionally *not* a "reference renderer":
//! - It does **not** rasterize to pixels.
//! - It does **not** establish "golden" rendering behavior across engines.
//! - It is intended primarily for tests and debugging that want to assert
//!   on the exact primitive calls the emulation layer issues and on the
//!   canvas state at the time each call was made.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use fresco_engine::{
    Canvas, Color, EngineCaps, FontSpec, Image, ImageInfo, Paint, Path, Surface, TextCanvas,
};
use fresco_matrix::{Matrix33, m33};
use kurbo::{PathEl, Rect};
use peniko::{ImageAlphaType, ImageFormat};

/// Per-glyph advance, as a fraction of the font size, in the deterministic
/// width model used by [`TextCanvas::measure_text`].
pub const ADVANCE_PER_CHAR: f64 = 0.6;

/// Snapshot of the canvas state at the time an event was recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSnapshot {
    /// Current transform.
    pub transform: Matrix33,
    /// Depth of the save stack.
    pub save_depth: usize,
    /// Number of clips applied and not yet restored.
    pub clip_depth: usize,
}

/// One recorded canvas call.
#[derive(Clone, Debug)]
pub enum Event {
    /// A `save` call.
    Save,
    /// A `restore` call (recorded even when the stack was empty).
    Restore,
    /// A transform concatenation, with the matrix that was applied.
    Concat(Matrix33),
    /// A transform replacement.
    SetMatrix(Matrix33),
    /// A full-surface clear.
    Clear(Color),
    /// A path draw.
    DrawPath {
        /// The path's elements at draw time.
        elements: Vec<PathEl>,
        /// The paint as configured for this draw.
        paint: Paint,
        /// State at draw time.
        state: StateSnapshot,
    },
    /// A rectangle draw.
    DrawRect {
        /// The rectangle.
        rect: Rect,
        /// The paint as configured for this draw.
        paint: Paint,
        /// State at draw time.
        state: StateSnapshot,
    },
    /// A clip intersection.
    ClipPath {
        /// The clip path's elements.
        elements: Vec<PathEl>,
    },
    /// An image draw.
    DrawImageRect {
        /// Source rectangle in image pixels.
        src: Rect,
        /// Destination rectangle in user space.
        dst: Rect,
        /// The paint as configured for this draw.
        paint: Paint,
        /// State at draw time.
        state: StateSnapshot,
    },
    /// A text draw.
    DrawText {
        /// The text.
        text: String,
        /// Baseline origin x.
        x: f64,
        /// Baseline origin y.
        y: f64,
        /// Resolved font.
        font: FontSpec,
        /// The paint as configured for this draw.
        paint: Paint,
        /// State at draw time.
        state: StateSnapshot,
    },
}

/// Recording surface: stores every canvas call as an [`Event`].
#[derive(Debug)]
pub struct RefSurface {
    width: u32,
    height: u32,
    events: Vec<Event>,
    transform: Matrix33,
    /// Saved (transform, clip depth) frames.
    stack: Vec<(Matrix33, usize)>,
    clip_depth: usize,
}

impl RefSurface {
    /// Creates a recording surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            events: Vec::new(),
            transform: m33::identity(),
            stack: Vec::new(),
            clip_depth: 0,
        }
    }

    /// The recorded events, in call order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Clears the event log but keeps the canvas state.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// The draw events (paths, rects, images, text), skipping state calls.
    pub fn draw_events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| {
            matches!(
                e,
                Event::DrawPath { .. }
                    | Event::DrawRect { .. }
                    | Event::DrawImageRect { .. }
                    | Event::DrawText { .. }
            )
        })
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            transform: self.transform,
            save_depth: self.stack.len(),
            clip_depth: self.clip_depth,
        }
    }
}

impl Canvas for RefSurface {
    fn save(&mut self) {
        self.stack.push((self.transform, self.clip_depth));
        self.events.push(Event::Save);
    }

    fn restore(&mut self) {
        if let Some((transform, clip_depth)) = self.stack.pop() {
            self.transform = transform;
            self.clip_depth = clip_depth;
        }
        self.events.push(Event::Restore);
    }

    fn concat(&mut self, matrix: &Matrix33) {
        self.transform = m33::mul(&self.transform, matrix);
        self.events.push(Event::Concat(*matrix));
    }

    fn set_matrix(&mut self, matrix: &Matrix33) {
        self.transform = *matrix;
        self.events.push(Event::SetMatrix(*matrix));
    }

    fn total_matrix(&self) -> Matrix33 {
        self.transform
    }

    fn clear(&mut self, color: Color) {
        self.events.push(Event::Clear(color));
    }

    fn draw_path(&mut self, path: &Path, paint: &Paint) {
        let state = self.snapshot();
        self.events.push(Event::DrawPath {
            elements: path.elements().to_vec(),
            paint: paint.clone(),
            state,
        });
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        let state = self.snapshot();
        self.events.push(Event::DrawRect {
            rect,
            paint: paint.clone(),
            state,
        });
    }

    fn clip_path(&mut self, path: &Path) {
        self.clip_depth += 1;
        self.events.push(Event::ClipPath {
            elements: path.elements().to_vec(),
        });
    }

    fn draw_image_rect(&mut self, _image: &Image, src: Rect, dst: Rect, paint: &Paint) {
        let state = self.snapshot();
        self.events.push(Event::DrawImageRect {
            src,
            dst,
            paint: paint.clone(),
            state,
        });
    }

    fn read_pixels(&mut self, _x: i32, _y: i32, _width: u32, _height: u32) -> Option<Vec<u8>> {
        None
    }

    fn capabilities(&self) -> EngineCaps {
        EngineCaps::IMAGES | EngineCaps::TEXT
    }

    fn text(&mut self) -> Option<&mut dyn TextCanvas> {
        Some(self)
    }
}

impl TextCanvas for RefSurface {
    fn draw_text(&mut self, text: &str, x: f64, y: f64, font: &FontSpec, paint: &Paint) {
        let state = self.snapshot();
        self.events.push(Event::DrawText {
            text: String::from(text),
            x,
            y,
            font: font.clone(),
            paint: paint.clone(),
            state,
        });
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64 {
        // Deterministic width model so measurement-dependent logic is testable.
        ADVANCE_PER_CHAR * font.size_pt * text.chars().count() as f64
    }
}

impl Surface for RefSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        self
    }

    fn flush(&mut self) {}

    fn make_image_snapshot(&mut self) -> Image {
        let len = self.width as usize * self.height as usize * 4;
        Image {
            info: ImageInfo {
                width: self.width,
                height: self.height,
                format: ImageFormat::Rgba8,
                alpha_type: ImageAlphaType::Alpha,
            },
            pixels: Arc::from(alloc::vec![0u8; len].as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_round_trips_the_transform() {
        let mut surface = RefSurface::new(100, 100);
        surface.save();
        surface.translate(10.0, 20.0);
        assert_eq!(m33::map_point(&surface.total_matrix(), 0.0, 0.0), (10.0, 20.0));
        surface.restore();
        assert_eq!(surface.total_matrix(), m33::identity());
    }

    #[test]
    fn restore_on_empty_stack_is_a_noop() {
        let mut surface = RefSurface::new(10, 10);
        surface.translate(5.0, 5.0);
        surface.restore();
        assert_eq!(m33::map_point(&surface.total_matrix(), 0.0, 0.0), (5.0, 5.0));
    }

    #[test]
    fn draws_capture_state_snapshots() {
        let mut surface = RefSurface::new(10, 10);
        surface.save();
        let mut clip = Path::new();
        clip.add_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        surface.clip_path(&clip);
        surface.draw_rect(Rect::new(1.0, 1.0, 2.0, 2.0), &Paint::default());
        let Some(Event::DrawRect { state, .. }) = surface.events().last() else {
            panic!("expected a rect draw event");
        };
        assert_eq!(state.save_depth, 1);
        assert_eq!(state.clip_depth, 1);
    }

    #[test]
    fn text_width_model_is_linear() {
        let mut surface = RefSurface::new(10, 10);
        let font = FontSpec {
            size_pt: 10.0,
            ..FontSpec::default()
        };
        assert_eq!(surface.measure_text("abcd", &font), 24.0);
        assert_eq!(surface.measure_text("", &font), 0.0);
    }
}
