// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS font shorthand parsing.
//!
//! The context's `font` property takes a CSS shorthand like
//! `"italic bold 16px Arial"`. We resolve it once at assignment time into a
//! [`FontSpec`] with the size converted to points, the single canonical
//! unit the engine's text capability receives.

use fresco_engine::{FontSpec, FontStyle};

/// Reference height used by relative size units (`em`, `rem`, `%`).
pub const DEFAULT_FONT_HEIGHT: f64 = 12.0;

/// Size in points used when no size can be parsed out of the shorthand.
const FALLBACK_SIZE_PT: f64 = 16.0;

/// Parses a CSS font shorthand.
///
/// Style, variant, and weight keywords may appear in any order before the
/// size; everything after the size is the family list. An unparsable size
/// logs a warning and falls back to 16pt, keeping the other fields.
pub fn parse_font(shorthand: &str) -> FontSpec {
    let mut spec = FontSpec {
        size_pt: FALLBACK_SIZE_PT,
        ..FontSpec::default()
    };

    let mut family_tokens: Vec<&str> = Vec::new();
    let mut size_seen = false;
    for token in shorthand.split_whitespace() {
        if size_seen {
            family_tokens.push(token);
            continue;
        }
        if let Some(size_pt) = parse_size(token) {
            spec.size_pt = size_pt;
            size_seen = true;
            continue;
        }
        match token {
            "normal" => {}
            "italic" => spec.style = FontStyle::Italic,
            "oblique" => spec.style = FontStyle::Oblique,
            "small-caps" => spec.small_caps = true,
            "bold" | "bolder" => spec.weight = 700,
            "lighter" => spec.weight = 300,
            _ => {
                if let Ok(weight) = token.parse::<u16>() {
                    if (100..=900).contains(&weight) {
                        spec.weight = weight;
                    }
                }
            }
        }
    }

    if !size_seen {
        log::warn!("could not parse font size from {shorthand:?}");
    }
    if !family_tokens.is_empty() {
        spec.family = family_tokens.join(" ");
    }
    spec
}

/// Parses a `<number><unit>` token into points, handling an attached
/// `/line-height` suffix. Returns `None` for tokens that are not sizes.
fn parse_size(token: &str) -> Option<f64> {
    let token = token.split('/').next()?;
    let split = token
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .unwrap_or(token.len());
    let (number, unit) = token.split_at(split);
    let value = number.parse::<f64>().ok()?;
    let points = match unit {
        "pt" => value,
        "px" => value * 3.0 / 4.0,
        "pc" => value * 12.0,
        "in" => value * 72.0,
        "cm" => value * 72.0 / 2.54,
        "mm" => value * 72.0 / 25.4,
        "%" => value * DEFAULT_FONT_HEIGHT / 100.0,
        "em" | "rem" => value * DEFAULT_FONT_HEIGHT,
        "q" => value * (96.0 / 25.4 / 3.0),
        _ => return None,
    };
    Some(points)
}
