// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end raster checks through the vello_cpu engine.
//!
//! These sample pixels well inside (or well outside) the drawn geometry so
//! antialiasing at the edges cannot flip the assertions.

use std::f64::consts::TAU;

use fresco_canvas2d::CanvasElement;
use fresco_engine::Image;
use fresco_engine_vello_cpu::VelloCpuSurface;

fn element(size: u16) -> CanvasElement<VelloCpuSurface> {
    CanvasElement::new(VelloCpuSurface::new(size, size))
}

fn pixel(image: &Image, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * image.info.width + x) * 4) as usize;
    [
        image.pixels[i],
        image.pixels[i + 1],
        image.pixels[i + 2],
        image.pixels[i + 3],
    ]
}

#[test]
fn filled_circle_covers_its_center_and_not_the_corners() {
    let mut element = element(80);
    let ctx = element.get_context_2d();
    ctx.set_fill_style("red");
    ctx.begin_path();
    ctx.arc(40.0, 40.0, 30.0, 0.0, TAU, false).unwrap();
    ctx.fill();

    let img = element.to_image();
    assert_eq!(pixel(&img, 40, 40), [255, 0, 0, 255]);
    assert_eq!(pixel(&img, 2, 2)[3], 0);
}

#[test]
fn stroked_full_circle_has_no_gap_where_the_sweep_starts() {
    let mut element = element(80);
    let ctx = element.get_context_2d();
    ctx.set_stroke_style("#000000");
    ctx.set_line_width(4.0);
    ctx.begin_path();
    ctx.arc(40.0, 40.0, 30.0, 0.0, TAU, false).unwrap();
    ctx.stroke();

    let img = element.to_image();
    // The seam of a naive single-arc implementation would be exactly at
    // angle zero: the right extreme of the circle.
    assert_eq!(pixel(&img, 70, 40)[3], 255, "stroke must cover the 0-degree point");
    // And the rest of the ring is there too.
    assert_eq!(pixel(&img, 10, 40)[3], 255);
    assert_eq!(pixel(&img, 40, 70)[3], 255);
    // Inside stays empty.
    assert_eq!(pixel(&img, 40, 40)[3], 0);
}

#[test]
fn clear_rect_erases_locally() {
    let mut element = element(64);
    let ctx = element.get_context_2d();
    ctx.set_fill_style("green");
    ctx.fill_rect(0.0, 0.0, 64.0, 64.0);
    ctx.clear_rect(16.0, 16.0, 32.0, 32.0);

    let img = element.to_image();
    assert_eq!(pixel(&img, 32, 32)[3], 0);
    assert_eq!(pixel(&img, 4, 4), [0, 128, 0, 255]);
}

#[test]
fn clip_and_restore_bound_the_painted_region() {
    let mut element = element(64);
    let ctx = element.get_context_2d();
    ctx.save();
    ctx.begin_path();
    ctx.rect(0.0, 0.0, 32.0, 64.0);
    ctx.clip();
    ctx.set_fill_style("blue");
    ctx.fill_rect(0.0, 0.0, 64.0, 64.0);
    ctx.restore();
    ctx.set_fill_style("red");
    ctx.fill_rect(0.0, 48.0, 64.0, 8.0);

    let img = element.to_image();
    // Clipped fill only covered the left half.
    assert_eq!(pixel(&img, 8, 8), [0, 0, 255, 255]);
    assert_eq!(pixel(&img, 48, 8)[3], 0);
    // After restore the clip is gone.
    assert_eq!(pixel(&img, 60, 52), [255, 0, 0, 255]);
}

#[test]
fn transforms_apply_at_draw_time() {
    let mut element = element(64);
    let ctx = element.get_context_2d();
    ctx.translate(32.0, 32.0);
    ctx.set_fill_style("black");
    ctx.fill_rect(0.0, 0.0, 16.0, 16.0);

    let img = element.to_image();
    assert_eq!(pixel(&img, 40, 40)[3], 255);
    assert_eq!(pixel(&img, 8, 8)[3], 0);
}

#[test]
fn linear_gradient_shades_across_the_surface() {
    let mut element = element(80);
    let ctx = element.get_context_2d();
    let mut gradient = ctx.create_linear_gradient(0.0, 0.0, 80.0, 0.0);
    gradient.add_color_stop(0.0, "red").unwrap();
    gradient.add_color_stop(1.0, "blue").unwrap();
    ctx.set_fill_style(gradient);
    ctx.fill_rect(0.0, 0.0, 80.0, 80.0);

    let img = element.to_image();
    let left = pixel(&img, 4, 40);
    let right = pixel(&img, 76, 40);
    assert!(left[0] > left[2], "left side should be red-dominant, got {left:?}");
    assert!(right[2] > right[0], "right side should be blue-dominant, got {right:?}");
}

#[test]
fn global_alpha_shows_up_in_rendered_coverage() {
    let mut element = element(32);
    let ctx = element.get_context_2d();
    ctx.set_fill_style("black");
    ctx.set_global_alpha(0.5);
    ctx.fill_rect(0.0, 0.0, 32.0, 32.0);

    let img = element.to_image();
    let alpha = pixel(&img, 16, 16)[3];
    assert!((120..=136).contains(&alpha), "expected ~half coverage, got {alpha}");
}
