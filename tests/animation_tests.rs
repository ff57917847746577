//! Keyframe Path Sampling Tests
//!
//! Tests for:
//! - Knot vector validation
//! - Linear and spline segment sampling
//! - Orientation slerp
//! - Clamping outside the parameter range

use glam::{Quat, Vec3};
use orrery::animation::{sample_path, validate_knots, TcbKeyFrame};
use orrery::OrreryError;

fn frame(knot: f32, x: f32) -> TcbKeyFrame {
    TcbKeyFrame::new(knot, Vec3::new(x, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE)
}

fn linear_frame(knot: f32, x: f32) -> TcbKeyFrame {
    TcbKeyFrame::linear(knot, Vec3::new(x, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE)
}

// ============================================================================
// Knot Validation
// ============================================================================

#[test]
fn empty_path_is_invalid() {
    assert!(matches!(
        validate_knots(&[]),
        Err(OrreryError::InvalidKnots(_))
    ));
}

#[test]
fn single_keyframe_is_valid_at_any_knot() {
    assert!(validate_knots(&[frame(0.7, 1.0)]).is_ok());
}

#[test]
fn first_knot_must_be_zero() {
    assert!(validate_knots(&[frame(0.1, 0.0), frame(1.0, 1.0)]).is_err());
}

#[test]
fn last_knot_must_be_one() {
    assert!(validate_knots(&[frame(0.0, 0.0), frame(0.9, 1.0)]).is_err());
}

#[test]
fn knots_must_be_non_decreasing() {
    assert!(validate_knots(&[frame(0.0, 0.0), frame(0.6, 1.0), frame(0.4, 2.0), frame(1.0, 3.0)]).is_err());
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn single_keyframe_path_is_constant() {
    let frames = [frame(0.5, 3.0)];
    for alpha in [0.0, 0.4, 1.0] {
        let sample = sample_path(&frames, alpha).unwrap();
        assert_eq!(sample.position, Vec3::new(3.0, 0.0, 0.0));
    }
}

#[test]
fn sampling_at_knots_returns_keyframe_values() {
    let frames = [linear_frame(0.0, 0.0), linear_frame(0.5, 2.0), linear_frame(1.0, 6.0)];
    for (alpha, x) in [(0.0, 0.0), (0.5, 2.0), (1.0, 6.0)] {
        let sample = sample_path(&frames, alpha).unwrap();
        assert!((sample.position.x - x).abs() < 1e-5, "alpha {alpha}");
    }
}

#[test]
fn linear_segment_midpoint() {
    let frames = [linear_frame(0.0, 0.0), linear_frame(1.0, 10.0)];
    let sample = sample_path(&frames, 0.5).unwrap();
    assert!((sample.position.x - 5.0).abs() < 1e-5);
}

#[test]
fn sampling_clamps_outside_range() {
    let frames = [linear_frame(0.0, 1.0), linear_frame(1.0, 9.0)];
    assert_eq!(sample_path(&frames, -3.0).unwrap().position.x, 1.0);
    assert_eq!(sample_path(&frames, 7.0).unwrap().position.x, 9.0);
}

#[test]
fn spline_passes_through_keyframes() {
    let frames = [
        frame(0.0, 0.0),
        frame(0.25, 1.0),
        frame(0.75, -2.0),
        frame(1.0, 4.0),
    ];
    for (alpha, x) in [(0.0, 0.0), (0.25, 1.0), (0.75, -2.0), (1.0, 4.0)] {
        let sample = sample_path(&frames, alpha).unwrap();
        assert!(
            (sample.position.x - x).abs() < 1e-5,
            "alpha {alpha}: got {}",
            sample.position.x
        );
    }
}

#[test]
fn two_frame_spline_midpoint_is_halfway() {
    // With clamped neighbors the two-frame spline degenerates to a line at
    // the midpoint, whatever the tangents do elsewhere.
    let frames = [frame(0.0, 0.0), frame(1.0, 8.0)];
    let sample = sample_path(&frames, 0.5).unwrap();
    assert!((sample.position.x - 4.0).abs() < 1e-5);
}

#[test]
fn full_tension_flattens_tangents() {
    let frames = [
        frame(0.0, 0.0).with_tcb(1.0, 0.0, 0.0),
        frame(0.5, 2.0).with_tcb(1.0, 0.0, 0.0),
        frame(1.0, 0.0).with_tcb(1.0, 0.0, 0.0),
    ];
    // Zero tangents reduce Hermite blending to h00/h01 only.
    let sample = sample_path(&frames, 0.25).unwrap();
    assert!((sample.position.x - 1.0).abs() < 1e-5);
}

#[test]
fn scale_interpolates_alongside_position() {
    let a = TcbKeyFrame::linear(0.0, Vec3::ZERO, Quat::IDENTITY, Vec3::splat(1.0));
    let b = TcbKeyFrame::linear(1.0, Vec3::ZERO, Quat::IDENTITY, Vec3::splat(3.0));
    let sample = sample_path(&[a, b], 0.5).unwrap();
    assert!((sample.scale - Vec3::splat(2.0)).length() < 1e-5);
}

// ============================================================================
// Orientation
// ============================================================================

#[test]
fn orientation_slerps_halfway() {
    let a = TcbKeyFrame::linear(0.0, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
    let b = TcbKeyFrame::linear(
        1.0,
        Vec3::ZERO,
        Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        Vec3::ONE,
    );
    let sample = sample_path(&[a, b], 0.5).unwrap();

    let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
    assert!(sample.orientation.dot(expected).abs() > 1.0 - 1e-5);
}

#[test]
fn orientation_holds_at_endpoints() {
    let end = Quat::from_rotation_y(1.2);
    let a = TcbKeyFrame::linear(0.0, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
    let b = TcbKeyFrame::linear(1.0, Vec3::ZERO, end, Vec3::ONE);

    let start = sample_path(&[a, b], 0.0).unwrap().orientation;
    assert!(start.dot(Quat::IDENTITY).abs() > 1.0 - 1e-5);
    let finish = sample_path(&[a, b], 1.0).unwrap().orientation;
    assert!(finish.dot(end).abs() > 1.0 - 1e-5);
}
