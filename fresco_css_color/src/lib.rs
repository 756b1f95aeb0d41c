// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fresco CSS Color: parsing and canonical serialization of CSS color strings.
//!
//! The Canvas 2D context exposes `fillStyle`/`strokeStyle`/`shadowColor` as
//! CSS color strings, and serializes them back in a canonical form defined by
//! the HTML specification. This crate implements exactly that subset:
//!
//! - `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` hex forms (a single hex digit
//!   expands by repetition, i.e. `e` means `ee` and therefore ×17, not ×16),
//! - `rgb(…)` / `rgba(…)` with 3 or 4 comma-separated arguments accepted
//!   interchangeably under either prefix, alpha as a bare float or a
//!   percentage,
//! - the named CSS colors (see [`named`]).
//!
//! Parsing is permissive by design: an unrecognized string logs a warning
//! and yields opaque black, never an error. `gray(…)` and `hsl(…)` are not
//! implemented and take the same fallback.
//!
//! Serialization follows the canvas serialization rule: a fully opaque color
//! becomes lowercase `#rrggbb`; anything else becomes `rgba(r, g, b, a)`
//! where the alpha is printed as a bare `0` or `1` at the boundaries and
//! with exactly eight fractional digits otherwise. The asymmetry is
//! deliberate and load-bearing for output compatibility.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::String;

pub mod named;

/// An RGBA color.
///
/// Channels are 8-bit; alpha is kept as a float in `[0, 1]` so that parsed
/// values like `204/255` survive serialization unchanged. Construction
/// clamps rather than errors. Values are immutable once created.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f64,
}

impl Color {
    /// Opaque black, the fallback for unrecognized input.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 1.0,
    };

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    /// Creates a color from float channels, clamping and rounding
    /// out-of-range or non-finite input instead of erroring.
    ///
    /// `r`, `g`, `b` are in `[0, 255]`; `a` is in `[0, 1]`.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_unit(a),
        }
    }

    /// Unpacks a `0xAARRGGBB` integer.
    pub fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
            a: f64::from((packed >> 24) & 0xff) / 255.0,
        }
    }

    /// Packs into a `0xAARRGGBB` integer, rounding alpha to a byte.
    pub fn to_packed(self) -> u32 {
        (u32::from(clamp_channel(self.a * 255.0)) << 24)
            | (u32::from(self.r) << 16)
            | (u32::from(self.g) << 8)
            | u32::from(self.b)
    }

    /// Converts to the engine-native color representation.
    pub fn to_peniko(self) -> peniko::Color {
        peniko::Color::from_rgba8(self.r, self.g, self.b, clamp_channel(self.a * 255.0))
    }

    /// Extracts a color back out of the engine-native representation.
    pub fn from_peniko(color: peniko::Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: f64::from(rgba.a) / 255.0,
        }
    }

    /// Serializes in the canonical canvas form.
    ///
    /// Opaque colors become lowercase `#rrggbb`. Anything else becomes
    /// `rgba(r, g, b, a)` with the alpha printed as `0` or `1` exactly at
    /// the boundaries and with eight fractional digits otherwise.
    pub fn to_css_string(self) -> String {
        if self.a == 1.0 {
            return alloc::format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b);
        }
        if self.a == 0.0 {
            return alloc::format!("rgba({}, {}, {}, 0)", self.r, self.g, self.b);
        }
        alloc::format!("rgba({}, {}, {}, {:.8})", self.r, self.g, self.b, self.a)
    }
}

/// Returns a new color with the same RGB and `alpha * factor`, clamped to
/// `[0, 1]`. The input is unchanged.
pub fn multiply_by_alpha(color: Color, factor: f64) -> Color {
    Color {
        a: clamp_unit(color.a * factor),
        ..color
    }
}

/// Parses a CSS color string.
///
/// Accepts, case-insensitively, the hex, `rgb(…)`/`rgba(…)`, and named
/// forms described at the crate level. Unrecognized input (including the
/// unimplemented `gray(…)` and `hsl(…)` forms) logs a warning and returns
/// opaque black; this function never fails.
pub fn parse_color(color_str: &str) -> Color {
    let lowered = color_str.trim().to_ascii_lowercase();
    let s = lowered.as_str();

    if let Some(hex) = s.strip_prefix('#') {
        if let Some(color) = parse_hex(hex) {
            return color;
        }
    } else if let Some(body) = function_body(s, "rgba") {
        if let Some(color) = parse_rgb_args(body) {
            return color;
        }
    } else if let Some(body) = function_body(s, "rgb") {
        if let Some(color) = parse_rgb_args(body) {
            return color;
        }
    } else if function_body(s, "gray").is_some() || function_body(s, "hsl").is_some() {
        // Known gap: these grammars are not implemented and fall through to
        // the same fallback as unrecognized input.
    } else if let Some(packed) = named::lookup(s) {
        return Color::from_packed(packed);
    }

    log::warn!("unrecognized color {color_str:?}");
    Color::BLACK
}

/// See <https://drafts.csswg.org/css-color/#typedef-hex-color>.
fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| -> u8 { hex_digit(hex.as_bytes()[i]) };
    let pair = |i: usize| -> u8 { digit(i) * 16 + digit(i + 1) };
    // A single digit expands to the digit repeated, so `e` is `ee`: ×17.
    let (r, g, b, a) = match hex.len() {
        3 => (digit(0) * 17, digit(1) * 17, digit(2) * 17, 255),
        4 => (digit(0) * 17, digit(1) * 17, digit(2) * 17, digit(3) * 17),
        6 => (pair(0), pair(2), pair(4), 255),
        8 => (pair(0), pair(2), pair(4), pair(6)),
        _ => return None,
    };
    Some(Color {
        r,
        g,
        b,
        a: f64::from(a) / 255.0,
    })
}

fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Strips `name(` and the closing `)`, returning the argument list.
fn function_body<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')
}

/// Both `rgb(…)` and `rgba(…)` accept 3 or 4 comma-separated arguments.
fn parse_rgb_args(body: &str) -> Option<Color> {
    let mut parts = body.split(',');
    let r = parts.next()?.trim().parse::<f64>().ok()?;
    let g = parts.next()?.trim().parse::<f64>().ok()?;
    let b = parts.next()?.trim().parse::<f64>().ok()?;
    let a = value_or_percent(parts.next());
    if parts.next().is_some() {
        return None;
    }
    Some(Color::new(r, g, b, a))
}

/// An omitted or unparsable alpha defaults to fully opaque; a trailing `%`
/// divides by 100.
fn value_or_percent(token: Option<&str>) -> f64 {
    let Some(token) = token else {
        return 1.0;
    };
    let token = token.trim();
    if let Some(percent) = token.strip_suffix('%') {
        return percent.trim().parse::<f64>().map_or(1.0, |v| v / 100.0);
    }
    token.parse::<f64>().unwrap_or(1.0)
}

fn clamp_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    let rounded = (v + 0.5) as i64;
    rounded.clamp(0, 255) as u8
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
