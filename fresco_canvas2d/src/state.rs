// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing context's style state and the CSS composite keyword table.

use fresco_css_color::Color as CssColor;
use fresco_engine::{FontSpec, ImageQuality};
use kurbo::{Cap, Join};
use peniko::{BlendMode, Compose, Mix};

use crate::style::FillStyle;

/// `imageSmoothingQuality` values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SmoothingQuality {
    /// Fast, low quality filtering.
    #[default]
    Low,
    /// Medium quality filtering.
    Medium,
    /// Best quality filtering.
    High,
}

impl SmoothingQuality {
    pub(crate) fn to_engine(self) -> ImageQuality {
        match self {
            Self::Low => ImageQuality::Low,
            Self::Medium => ImageQuality::Medium,
            Self::High => ImageQuality::High,
        }
    }
}

/// Everything `save` snapshots besides the transform.
///
/// Every recognized option is an explicit field with its default fixed at
/// construction; nothing is looked up by string key at draw time.
#[derive(Clone, Debug)]
pub(crate) struct DrawState {
    pub(crate) fill_style: FillStyle,
    pub(crate) stroke_style: FillStyle,
    pub(crate) line_width: f64,
    pub(crate) line_cap: Cap,
    pub(crate) line_join: Join,
    pub(crate) miter_limit: f64,
    pub(crate) line_dash: Vec<f64>,
    pub(crate) line_dash_offset: f64,
    pub(crate) global_alpha: f64,
    pub(crate) composite: BlendMode,
    pub(crate) shadow_offset_x: f64,
    pub(crate) shadow_offset_y: f64,
    pub(crate) shadow_blur: f64,
    pub(crate) shadow_color: CssColor,
    pub(crate) font: FontSpec,
    pub(crate) font_string: String,
    pub(crate) image_smoothing_enabled: bool,
    pub(crate) image_smoothing_quality: SmoothingQuality,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill_style: FillStyle::Color(CssColor::BLACK),
            stroke_style: FillStyle::Color(CssColor::BLACK),
            line_width: 1.0,
            line_cap: Cap::Butt,
            line_join: Join::Miter,
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            global_alpha: 1.0,
            composite: BlendMode::default(),
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            shadow_blur: 0.0,
            shadow_color: CssColor::TRANSPARENT,
            font: FontSpec::default(),
            font_string: String::from("10px sans-serif"),
            image_smoothing_enabled: true,
            image_smoothing_quality: SmoothingQuality::Low,
        }
    }
}

/// Maps a `globalCompositeOperation` keyword onto an engine blend mode.
///
/// Returns `None` for unknown keywords and for `plus-darker`, which has no
/// engine counterpart.
pub(crate) fn parse_composite_operation(keyword: &str) -> Option<BlendMode> {
    let compose = |compose| BlendMode {
        mix: Mix::Normal,
        compose,
    };
    let mix = |mix| BlendMode {
        mix,
        compose: Compose::SrcOver,
    };
    Some(match keyword {
        // composite-mode
        "source-over" => compose(Compose::SrcOver),
        "destination-over" => compose(Compose::DestOver),
        "copy" => compose(Compose::Copy),
        "destination" => compose(Compose::Dest),
        "clear" => compose(Compose::Clear),
        "source-in" => compose(Compose::SrcIn),
        "destination-in" => compose(Compose::DestIn),
        "source-out" => compose(Compose::SrcOut),
        "destination-out" => compose(Compose::DestOut),
        "source-atop" => compose(Compose::SrcAtop),
        "destination-atop" => compose(Compose::DestAtop),
        "xor" => compose(Compose::Xor),
        "lighter" | "plus-lighter" => compose(Compose::Plus),
        // blend-mode
        "multiply" => mix(Mix::Multiply),
        "screen" => mix(Mix::Screen),
        "overlay" => mix(Mix::Overlay),
        "darken" => mix(Mix::Darken),
        "lighten" => mix(Mix::Lighten),
        "color-dodge" => mix(Mix::ColorDodge),
        "color-burn" => mix(Mix::ColorBurn),
        "hard-light" => mix(Mix::HardLight),
        "soft-light" => mix(Mix::SoftLight),
        "difference" => mix(Mix::Difference),
        "exclusion" => mix(Mix::Exclusion),
        "hue" => mix(Mix::Hue),
        "saturation" => mix(Mix::Saturation),
        "color" => mix(Mix::Color),
        "luminosity" => mix(Mix::Luminosity),
        _ => return None,
    })
}

/// The keyword for an engine blend mode, the inverse of
/// [`parse_composite_operation`].
pub(crate) fn composite_operation_keyword(mode: BlendMode) -> &'static str {
    match mode.mix {
        Mix::Multiply => return "multiply",
        Mix::Screen => return "screen",
        Mix::Overlay => return "overlay",
        Mix::Darken => return "darken",
        Mix::Lighten => return "lighten",
        Mix::ColorDodge => return "color-dodge",
        Mix::ColorBurn => return "color-burn",
        Mix::HardLight => return "hard-light",
        Mix::SoftLight => return "soft-light",
        Mix::Difference => return "difference",
        Mix::Exclusion => return "exclusion",
        Mix::Hue => return "hue",
        Mix::Saturation => return "saturation",
        Mix::Color => return "color",
        Mix::Luminosity => return "luminosity",
        _ => {}
    }
    match mode.compose {
        Compose::SrcOver => "source-over",
        Compose::DestOver => "destination-over",
        Compose::Copy => "copy",
        Compose::Dest => "destination",
        Compose::Clear => "clear",
        Compose::SrcIn => "source-in",
        Compose::DestIn => "destination-in",
        Compose::SrcOut => "source-out",
        Compose::DestOut => "destination-out",
        Compose::SrcAtop => "source-atop",
        Compose::DestAtop => "destination-atop",
        Compose::Xor => "xor",
        Compose::Plus | Compose::PlusLighter => "lighter",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        for keyword in [
            "source-over",
            "destination-over",
            "copy",
            "destination",
            "clear",
            "source-in",
            "destination-in",
            "source-out",
            "destination-out",
            "source-atop",
            "destination-atop",
            "xor",
            "lighter",
            "multiply",
            "screen",
            "overlay",
            "darken",
            "lighten",
            "color-dodge",
            "color-burn",
            "hard-light",
            "soft-light",
            "difference",
            "exclusion",
            "hue",
            "saturation",
            "color",
            "luminosity",
        ] {
            let mode = parse_composite_operation(keyword)
                .unwrap_or_else(|| panic!("{keyword} should parse"));
            assert_eq!(composite_operation_keyword(mode), keyword);
        }
    }

    #[test]
    fn unknown_keywords_are_rejected() {
        assert!(parse_composite_operation("plus-darker").is_none());
        assert!(parse_composite_operation("blend-harder").is_none());
    }

    #[test]
    fn default_state_matches_the_canvas_spec() {
        let state = DrawState::default();
        assert_eq!(state.line_width, 1.0);
        assert_eq!(state.global_alpha, 1.0);
        assert_eq!(state.shadow_color, CssColor::TRANSPARENT);
        assert_eq!(composite_operation_keyword(state.composite), "source-over");
    }
}
