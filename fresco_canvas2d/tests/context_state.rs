// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform stacking, save/restore semantics, and the permissive style
//! property setters.

use fresco_canvas2d::{CanvasElement, Context2d, FillStyle};
use fresco_engine_ref::RefSurface;
use fresco_matrix::m33;
use kurbo::{Cap, PathEl, Point};

fn context() -> Context2d<RefSurface> {
    Context2d::new(RefSurface::new(200, 200))
}

#[test]
fn set_transform_pins_the_axis_mapping() {
    let mut ctx = context();
    ctx.set_transform(2.0, 0.0, -0.5, 2.5, -40.0, 120.0);
    let m = ctx.current_transform();
    assert_eq!(m33::map_point(&m, 0.0, 0.0), (-40.0, 120.0));
    // (1, 0) picks up only the a/b column: (2 - 40, 0 + 120).
    assert_eq!(m33::map_point(&m, 1.0, 0.0), (-38.0, 120.0));
    // (0, 1) picks up the c/d column.
    assert_eq!(m33::map_point(&m, 0.0, 1.0), (-40.5, 122.5));
}

#[test]
fn set_transform_replaces_rather_than_concatenates() {
    let mut ctx = context();
    ctx.translate(10.0, 10.0);
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 5.0, 5.0);
    assert_eq!(m33::map_point(&ctx.current_transform(), 0.0, 0.0), (5.0, 5.0));
}

#[test]
fn reset_transform_returns_to_identity() {
    let mut ctx = context();
    ctx.scale(2.0, 3.0);
    ctx.rotate(0.5);
    ctx.reset_transform();
    assert!(m33::nearly_equal(&ctx.current_transform(), &m33::identity(), 1e-12));
}

#[test]
fn non_finite_transforms_are_ignored() {
    let mut ctx = context();
    ctx.translate(10.0, 0.0);
    let before = ctx.current_transform();
    ctx.translate(f64::NAN, 0.0);
    ctx.scale(f64::INFINITY, 1.0);
    ctx.rotate(f64::NAN);
    ctx.transform(1.0, 0.0, 0.0, 1.0, f64::NAN, 0.0);
    ctx.set_transform(1.0, f64::INFINITY, 0.0, 1.0, 0.0, 0.0);
    assert_eq!(ctx.current_transform(), before);
}

#[test]
fn transform_changes_keep_recorded_path_segments_anchored() {
    let mut ctx = context();
    ctx.move_to(10.0, 10.0);
    ctx.translate(40.0, 0.0);
    ctx.line_to(10.0, 10.0);
    // The first point was recorded before the translate and must stay at
    // device (10, 10): in the new user space that is (-30, 10).
    assert_eq!(
        ctx.current_path().elements(),
        &[
            PathEl::MoveTo(Point::new(-30.0, 10.0)),
            PathEl::LineTo(Point::new(10.0, 10.0)),
        ]
    );
}

#[test]
fn save_restore_round_trips_state_and_transform() {
    let mut ctx = context();
    ctx.set_fill_style("red");
    ctx.set_line_width(4.0);
    ctx.translate(10.0, 20.0);
    ctx.save();

    ctx.set_fill_style("blue");
    ctx.set_line_width(8.0);
    ctx.set_global_alpha(0.5);
    ctx.scale(2.0, 2.0);
    ctx.restore();

    assert_eq!(ctx.line_width(), 4.0);
    assert_eq!(ctx.global_alpha(), 1.0);
    assert_eq!(
        ctx.fill_style().to_css().as_deref(),
        Some("#ff0000"),
        "fill style should be restored"
    );
    assert_eq!(m33::map_point(&ctx.current_transform(), 0.0, 0.0), (10.0, 20.0));
}

#[test]
fn snapshots_are_deep_copies() {
    let mut ctx = context();
    let mut gradient = ctx.create_linear_gradient(0.0, 0.0, 10.0, 0.0);
    gradient.add_color_stop(0.0, "red").unwrap();
    ctx.set_fill_style(gradient);
    ctx.save();
    // Mutating the live style after save must not alter the snapshot.
    ctx.set_fill_style("blue");
    ctx.set_line_dash(&[1.0, 2.0]);
    ctx.restore();
    assert!(matches!(ctx.fill_style(), FillStyle::LinearGradient(_)));
    assert!(ctx.line_dash().is_empty());
}

#[test]
fn restore_on_empty_stack_is_a_noop() {
    let mut ctx = context();
    ctx.set_line_width(7.0);
    ctx.restore();
    assert_eq!(ctx.line_width(), 7.0);
}

#[test]
fn line_width_ignores_invalid_assignments() {
    let mut ctx = context();
    assert_eq!(ctx.line_width(), 1.0);
    ctx.set_line_width(5.0);
    for bad in [0.0, -3.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        ctx.set_line_width(bad);
        assert_eq!(ctx.line_width(), 5.0, "width {bad} should be ignored");
    }
}

#[test]
fn global_alpha_ignores_out_of_range_assignments() {
    let mut ctx = context();
    ctx.set_global_alpha(0.25);
    for bad in [-0.1, 1.1, f64::NAN, f64::INFINITY] {
        ctx.set_global_alpha(bad);
        assert_eq!(ctx.global_alpha(), 0.25);
    }
    ctx.set_global_alpha(0.0);
    assert_eq!(ctx.global_alpha(), 0.0);
}

#[test]
fn shadow_setters_follow_the_permissive_model() {
    let mut ctx = context();
    ctx.set_shadow_blur(4.0);
    ctx.set_shadow_blur(-1.0);
    ctx.set_shadow_blur(f64::NAN);
    assert_eq!(ctx.shadow_blur(), 4.0);
    ctx.set_shadow_blur(0.0);
    assert_eq!(ctx.shadow_blur(), 0.0);

    ctx.set_shadow_offset_x(3.0);
    ctx.set_shadow_offset_x(f64::INFINITY);
    assert_eq!(ctx.shadow_offset_x(), 3.0);

    ctx.set_shadow_color("rgba(0, 0, 255, 0.5)");
    assert_eq!(ctx.shadow_color(), "rgba(0, 0, 255, 0.50000000)");
}

#[test]
fn line_dash_validation_and_odd_duplication() {
    let mut ctx = context();
    ctx.set_line_dash(&[5.0, 10.0]);
    assert_eq!(ctx.line_dash(), &[5.0, 10.0]);

    // Odd lists are concatenated with themselves.
    ctx.set_line_dash(&[1.0, 2.0, 3.0]);
    assert_eq!(ctx.line_dash(), &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);

    // Invalid entries reject the whole assignment.
    ctx.set_line_dash(&[4.0, -1.0]);
    assert_eq!(ctx.line_dash(), &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
    ctx.set_line_dash(&[4.0, f64::NAN]);
    assert_eq!(ctx.line_dash(), &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);

    ctx.set_line_dash(&[]);
    assert!(ctx.line_dash().is_empty());

    ctx.set_line_dash_offset(2.5);
    ctx.set_line_dash_offset(f64::NAN);
    assert_eq!(ctx.line_dash_offset(), 2.5);
}

#[test]
fn composite_operation_keywords_round_trip_through_the_setter() {
    let mut ctx = context();
    assert_eq!(ctx.global_composite_operation(), "source-over");
    ctx.set_global_composite_operation("multiply");
    assert_eq!(ctx.global_composite_operation(), "multiply");
    ctx.set_global_composite_operation("destination-out");
    assert_eq!(ctx.global_composite_operation(), "destination-out");
    // Unknown keywords are ignored.
    ctx.set_global_composite_operation("not-a-mode");
    assert_eq!(ctx.global_composite_operation(), "destination-out");
}

#[test]
fn fill_style_serializes_like_the_canvas() {
    let mut ctx = context();
    ctx.set_fill_style("#663399");
    assert_eq!(ctx.fill_style().to_css().as_deref(), Some("#663399"));
    ctx.set_fill_style("rgba(255, 235, 205, 0.5)");
    assert_eq!(
        ctx.fill_style().to_css().as_deref(),
        Some("rgba(255, 235, 205, 0.50000000)")
    );
    // Unknown strings fall back to opaque black.
    ctx.set_fill_style("no-such-color");
    assert_eq!(ctx.fill_style().to_css().as_deref(), Some("#000000"));
}

#[test]
fn font_assignment_resolves_once() {
    let mut ctx = context();
    assert_eq!(ctx.font(), "10px sans-serif");
    ctx.set_font("italic bold 16px Arial");
    assert_eq!(ctx.font(), "italic bold 16px Arial");
    // The resolved size drives measurement (0.6 * 12pt * 2 chars).
    let metrics = ctx.measure_text("ab");
    assert!((metrics.width - 14.4).abs() < 1e-9);
}

#[test]
fn line_cap_and_join_are_typed() {
    let mut ctx = context();
    assert_eq!(ctx.line_cap(), Cap::Butt);
    ctx.set_line_cap(Cap::Round);
    assert_eq!(ctx.line_cap(), Cap::Round);
    ctx.set_miter_limit(4.0);
    ctx.set_miter_limit(-2.0);
    assert_eq!(ctx.miter_limit(), 4.0);
}

#[test]
fn element_exposes_the_context_and_size() {
    let mut element = CanvasElement::new(RefSurface::new(320, 240));
    assert_eq!(element.width(), 320);
    assert_eq!(element.height(), 240);
    element.get_context_2d().fill_rect(0.0, 0.0, 1.0, 1.0);
    let image = element.to_image();
    assert_eq!(image.info.width, 320);
}
