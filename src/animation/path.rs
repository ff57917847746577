use glam::{Quat, Vec3};

use crate::animation::keyframe::{InterpolationMode, TcbKeyFrame};
use crate::errors::{OrreryError, Result};

/// The pose sampled from a keyframe path at one parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

/// Checks that `frames` forms a valid path parameterization.
///
/// Knots must be non-decreasing, start at 0.0 and end at 1.0. A single
/// keyframe is valid regardless of its knot (the path is constant).
pub fn validate_knots(frames: &[TcbKeyFrame]) -> Result<()> {
    if frames.is_empty() {
        return Err(OrreryError::InvalidKnots("keyframe array is empty"));
    }
    if frames.len() == 1 {
        return Ok(());
    }
    if frames[0].knot != 0.0 {
        return Err(OrreryError::InvalidKnots("first knot must be 0.0"));
    }
    if frames[frames.len() - 1].knot != 1.0 {
        return Err(OrreryError::InvalidKnots("last knot must be 1.0"));
    }
    if frames.windows(2).any(|w| w[1].knot < w[0].knot) {
        return Err(OrreryError::InvalidKnots("knots must be non-decreasing"));
    }
    Ok(())
}

/// Samples the path at `alpha`, clamped to `[0, 1]`.
///
/// Position and scale follow the segment mode of the keyframe the segment
/// leaves from: straight interpolation for [`InterpolationMode::Linear`],
/// Kochanek-Bartels cubic Hermite otherwise. Orientation is always
/// spherically interpolated between the segment endpoints.
pub fn sample_path(frames: &[TcbKeyFrame], alpha: f32) -> Result<PathSample> {
    validate_knots(frames)?;

    if frames.len() == 1 {
        return Ok(sample_of(&frames[0]));
    }

    let alpha = alpha.clamp(0.0, 1.0);

    // partition_point finds the first knot > alpha, i.e. the segment end.
    let next = frames.partition_point(|f| f.knot <= alpha);
    if next == 0 {
        return Ok(sample_of(&frames[0]));
    }
    if next >= frames.len() {
        return Ok(sample_of(&frames[frames.len() - 1]));
    }

    let i = next - 1;
    let k0 = frames[i].knot;
    let k1 = frames[next].knot;
    let dk = k1 - k0;
    // Coincident knots produce a step at the segment start.
    let u = if dk > 1e-6 { (alpha - k0) / dk } else { 0.0 };
    let u = u.clamp(0.0, 1.0);

    let orientation = frames[i].orientation.slerp(frames[next].orientation, u);

    let (position, scale) = match frames[i].mode {
        InterpolationMode::Linear => (
            frames[i].position.lerp(frames[next].position, u),
            frames[i].scale.lerp(frames[next].scale, u),
        ),
        InterpolationMode::Spline => {
            let prev = &frames[i.saturating_sub(1)];
            let after = &frames[(next + 1).min(frames.len() - 1)];
            (
                hermite(
                    prev.position,
                    &frames[i],
                    &frames[next],
                    after.position,
                    u,
                    |f| f.position,
                ),
                hermite(prev.scale, &frames[i], &frames[next], after.scale, u, |f| {
                    f.scale
                }),
            )
        }
    };

    Ok(PathSample {
        position,
        orientation,
        scale,
    })
}

fn sample_of(frame: &TcbKeyFrame) -> PathSample {
    PathSample {
        position: frame.position,
        orientation: frame.orientation,
        scale: frame.scale,
    }
}

/// Cubic Hermite segment between `from` and `to` with Kochanek-Bartels
/// tangents. `before` and `after` are the clamped neighbor values; each
/// endpoint's own tension/continuity/bias shapes its tangent.
fn hermite(
    before: Vec3,
    from: &TcbKeyFrame,
    to: &TcbKeyFrame,
    after: Vec3,
    u: f32,
    value: impl Fn(&TcbKeyFrame) -> Vec3,
) -> Vec3 {
    let p0 = value(from);
    let p1 = value(to);

    let out_tangent = {
        let (t, c, b) = (from.tension, from.continuity, from.bias);
        0.5 * (1.0 - t)
            * ((1.0 + c) * (1.0 + b) * (p0 - before) + (1.0 - c) * (1.0 - b) * (p1 - p0))
    };
    let in_tangent = {
        let (t, c, b) = (to.tension, to.continuity, to.bias);
        0.5 * (1.0 - t)
            * ((1.0 - c) * (1.0 + b) * (p1 - p0) + (1.0 + c) * (1.0 - b) * (after - p1))
    };

    let u2 = u * u;
    let u3 = u2 * u;
    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;

    h00 * p0 + h10 * out_tangent + h01 * p1 + h11 * in_tangent
}
