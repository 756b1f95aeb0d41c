// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain-data paint, image, and font descriptions.

use alloc::string::String;
use alloc::sync::Arc;

use kurbo::{Cap, Join, Stroke};
use peniko::{BlendMode, Brush, Color, ImageAlphaType, ImageFormat};

/// Whether a paint fills or strokes geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PaintStyle {
    /// Fill the interior under the path's fill rule.
    Fill,
    /// Stroke the outline using the paint's stroke parameters.
    Stroke,
}

/// Image sampling quality.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageQuality {
    /// Nearest-neighbor sampling.
    None,
    /// Bilinear sampling.
    Low,
    /// Bilinear sampling with mipmaps where the backend has them.
    Medium,
    /// Bicubic sampling where the backend has it.
    High,
}

/// A complete paint configuration for one draw call.
///
/// Paints are plain data: configuring one never touches engine state, and
/// callers build a fresh value per draw instead of mutating a shared
/// object mid-stroke.
#[derive(Clone, Debug)]
pub struct Paint {
    /// What to draw with (solid color, gradient, image).
    pub brush: Brush,
    /// Fill or stroke.
    pub style: PaintStyle,
    /// Stroke geometry parameters, including the dash pattern and offset.
    /// Ignored when filling.
    pub stroke: Stroke,
    /// Blend mode used to composite this draw.
    pub blend: BlendMode,
    /// Whether edges are antialiased.
    pub anti_alias: bool,
    /// Extra alpha applied to the whole draw, for brushes whose color
    /// cannot carry it (gradients, images).
    pub opacity: Option<f32>,
    /// Gaussian blur sigma applied to the rendered coverage (shadows).
    pub mask_blur: Option<f32>,
    /// Sampling quality for image brushes and image draws.
    pub quality: ImageQuality,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            brush: Brush::Solid(Color::BLACK),
            style: PaintStyle::Fill,
            stroke: Stroke::new(1.0)
                .with_caps(Cap::Butt)
                .with_join(Join::Miter)
                .with_miter_limit(10.0),
            blend: BlendMode::default(),
            anti_alias: true,
            opacity: None,
            mask_blur: None,
            quality: ImageQuality::Low,
        }
    }
}

/// Pixel geometry and encoding of an [`Image`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel layout.
    pub format: ImageFormat,
    /// Straight vs premultiplied alpha.
    pub alpha_type: ImageAlphaType,
}

/// An immutable raster image: a pixel description plus shared bytes.
#[derive(Clone, Debug)]
pub struct Image {
    /// Pixel geometry and encoding.
    pub info: ImageInfo,
    /// Tightly packed row-major pixel data.
    pub pixels: Arc<[u8]>,
}

impl Image {
    /// Wraps tightly packed straight-alpha RGBA8 pixels.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_rgba8(pixels: &[u8], width: u32, height: u32) -> Option<Self> {
        if pixels.len() as u64 != u64::from(width) * u64::from(height) * 4 {
            return None;
        }
        Some(Self {
            info: ImageInfo {
                width,
                height,
                format: ImageFormat::Rgba8,
                alpha_type: ImageAlphaType::Alpha,
            },
            pixels: Arc::from(pixels),
        })
    }
}

/// Slant of a font face.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FontStyle {
    /// Upright.
    Normal,
    /// Italic.
    Italic,
    /// Obliqued upright.
    Oblique,
}

/// A resolved font request handed to the engine's text capability.
///
/// Sizes are always in points, the single canonical unit every CSS length
/// is converted into before reaching the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family list as written (e.g. `"Arial, sans-serif"`).
    pub family: String,
    /// Size in points.
    pub size_pt: f64,
    /// CSS weight, 100–900.
    pub weight: u16,
    /// Slant.
    pub style: FontStyle,
    /// Whether the small-caps variant was requested.
    pub small_caps: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        // The canvas default font is "10px sans-serif"; 10px is 7.5pt.
        Self {
            family: String::from("sans-serif"),
            size_pt: 7.5,
            weight: 400,
            style: FontStyle::Normal,
            small_caps: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paint_matches_canvas_defaults() {
        let paint = Paint::default();
        assert_eq!(paint.stroke.width, 1.0);
        assert_eq!(paint.stroke.start_cap, Cap::Butt);
        assert_eq!(paint.stroke.join, Join::Miter);
        assert_eq!(paint.stroke.miter_limit, 10.0);
        assert!(paint.anti_alias);
        assert!(paint.mask_blur.is_none());
    }

    #[test]
    fn image_length_is_validated() {
        assert!(Image::from_rgba8(&[0; 16], 2, 2).is_some());
        assert!(Image::from_rgba8(&[0; 15], 2, 2).is_none());
    }
}
