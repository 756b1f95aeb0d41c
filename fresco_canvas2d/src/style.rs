// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill/stroke style sources: colors and gradients.

use fresco_css_color::{Color as CssColor, parse_color};
use kurbo::Point;
use peniko::{
    ColorStop, Extend, Gradient, GradientKind, LinearGradientPosition, RadialGradientPosition,
};

use crate::CanvasError;

/// Ordered gradient color stops.
///
/// Stops added at an already-present offset overwrite that stop's color
/// (the first stop at an offset wins the position, later ones its color);
/// new offsets are inserted in sorted order. This matches the canvas rule
/// that stops at equal offsets collapse, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GradientStops {
    offsets: Vec<f64>,
    colors: Vec<CssColor>,
}

impl GradientStops {
    /// Adds a color stop. The offset must be finite and in `[0, 1]`; the
    /// color string takes the usual parse-or-black fallback.
    pub fn add_color_stop(&mut self, offset: f64, color: &str) -> Result<(), CanvasError> {
        if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
            return Err(CanvasError::InvalidColorStop);
        }
        let color = parse_color(color);
        match self.offsets.iter().position(|&o| o == offset) {
            Some(idx) => self.colors[idx] = color,
            None => {
                let idx = self.offsets.iter().position(|&o| o > offset).unwrap_or(self.offsets.len());
                self.offsets.insert(idx, offset);
                self.colors.insert(idx, color);
            }
        }
        Ok(())
    }

    /// True if no stop has been added.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    fn to_peniko(&self) -> Vec<ColorStop> {
        self.offsets
            .iter()
            .zip(self.colors.iter())
            .map(|(&offset, color)| ColorStop::from((offset as f32, color.to_peniko())))
            .collect()
    }
}

/// An axial gradient between two user-space points.
///
/// The points are mapped through the current transform when the gradient is
/// turned into an engine brush, per the canvas rendering rules.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    /// Color stops.
    pub stops: GradientStops,
}

impl LinearGradient {
    /// Creates a gradient along the line from `(x0, y0)` to `(x1, y1)`.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            stops: GradientStops::default(),
        }
    }

    /// Adds a color stop. See [`GradientStops::add_color_stop`].
    pub fn add_color_stop(&mut self, offset: f64, color: &str) -> Result<(), CanvasError> {
        self.stops.add_color_stop(offset, color)
    }

    /// Builds the engine brush.
    ///
    /// The gradient line stays in user space; the engine maps it through
    /// the current transform at draw time, together with the geometry.
    pub(crate) fn to_brush(&self) -> Gradient {
        Gradient {
            kind: GradientKind::Linear(LinearGradientPosition::new(
                (self.x0, self.y0),
                (self.x1, self.y1),
            )),
            extend: Extend::Pad,
            stops: self.stops.to_peniko().as_slice().into(),
            ..Gradient::default()
        }
    }
}

/// A two-point conical gradient between two user-space circles.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    x0: f64,
    y0: f64,
    r0: f64,
    x1: f64,
    y1: f64,
    r1: f64,
    /// Color stops.
    pub stops: GradientStops,
}

impl RadialGradient {
    /// Creates a gradient between the circle at `(x0, y0)` with radius `r0`
    /// and the circle at `(x1, y1)` with radius `r1`.
    pub fn new(x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64) -> Self {
        Self {
            x0,
            y0,
            r0,
            x1,
            y1,
            r1,
            stops: GradientStops::default(),
        }
    }

    /// Adds a color stop. See [`GradientStops::add_color_stop`].
    pub fn add_color_stop(&mut self, offset: f64, color: &str) -> Result<(), CanvasError> {
        self.stops.add_color_stop(offset, color)
    }

    /// Builds the engine brush.
    ///
    /// Both circles stay in user space; the engine maps them through the
    /// current transform at draw time, together with the geometry.
    pub(crate) fn to_brush(&self) -> Gradient {
        Gradient {
            kind: GradientKind::Radial(RadialGradientPosition {
                start_center: Point::new(self.x0, self.y0),
                start_radius: self.r0 as f32,
                end_center: Point::new(self.x1, self.y1),
                end_radius: self.r1 as f32,
            }),
            extend: Extend::Pad,
            stops: self.stops.to_peniko().as_slice().into(),
            ..Gradient::default()
        }
    }
}

/// What a `fillStyle` or `strokeStyle` currently holds.
#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
    /// A solid color.
    Color(CssColor),
    /// A linear gradient.
    LinearGradient(LinearGradient),
    /// A radial (two-point conical) gradient.
    RadialGradient(RadialGradient),
}

impl FillStyle {
    /// The canonical CSS serialization, for solid colors.
    ///
    /// Gradient styles have no string form and return `None`.
    pub fn to_css(&self) -> Option<String> {
        match self {
            Self::Color(color) => Some(color.to_css_string()),
            _ => None,
        }
    }
}

impl From<&str> for FillStyle {
    fn from(s: &str) -> Self {
        Self::Color(parse_color(s))
    }
}

impl From<CssColor> for FillStyle {
    fn from(color: CssColor) -> Self {
        Self::Color(color)
    }
}

impl From<LinearGradient> for FillStyle {
    fn from(gradient: LinearGradient) -> Self {
        Self::LinearGradient(gradient)
    }
}

impl From<RadialGradient> for FillStyle {
    fn from(gradient: RadialGradient) -> Self {
        Self::RadialGradient(gradient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_insert_sorted_and_overwrite_same_offset() {
        let mut stops = GradientStops::default();
        stops.add_color_stop(1.0, "white").unwrap();
        stops.add_color_stop(0.0, "black").unwrap();
        stops.add_color_stop(0.5, "red").unwrap();
        stops.add_color_stop(0.5, "blue").unwrap();
        assert_eq!(stops.offsets, vec![0.0, 0.5, 1.0]);
        assert_eq!(stops.colors[1], parse_color("blue"));
    }

    #[test]
    fn out_of_range_offsets_error() {
        let mut gradient = LinearGradient::new(0.0, 0.0, 10.0, 0.0);
        assert_eq!(gradient.add_color_stop(-0.1, "red"), Err(CanvasError::InvalidColorStop));
        assert_eq!(gradient.add_color_stop(1.1, "red"), Err(CanvasError::InvalidColorStop));
        assert_eq!(
            gradient.add_color_stop(f64::NAN, "red"),
            Err(CanvasError::InvalidColorStop)
        );
        assert!(gradient.add_color_stop(0.0, "red").is_ok());
    }

    #[test]
    fn linear_brush_keeps_user_space_points() {
        let mut gradient = LinearGradient::new(0.0, 0.0, 10.0, 0.0);
        gradient.add_color_stop(0.0, "red").unwrap();
        gradient.add_color_stop(1.0, "blue").unwrap();
        let brush = gradient.to_brush();
        let GradientKind::Linear(position) = brush.kind else {
            panic!("expected a linear gradient kind");
        };
        assert_eq!(position.start, Point::new(0.0, 0.0));
        assert_eq!(position.end, Point::new(10.0, 0.0));
        assert_eq!(brush.stops.len(), 2);
    }

    #[test]
    fn radial_brush_is_two_point_conical() {
        let mut gradient = RadialGradient::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        gradient.add_color_stop(0.0, "red").unwrap();
        let brush = gradient.to_brush();
        let GradientKind::Radial(position) = brush.kind else {
            panic!("expected a radial gradient kind");
        };
        assert_eq!(position.start_center, Point::new(1.0, 2.0));
        assert_eq!(position.start_radius, 3.0);
        assert_eq!(position.end_center, Point::new(4.0, 5.0));
        assert_eq!(position.end_radius, 6.0);
    }
}
