use glam::{Quat, Vec3};

/// How the segment leaving a keyframe is interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Kochanek-Bartels (tension/continuity/bias) cubic segment.
    Spline,
    /// Straight linear segment.
    Linear,
}

/// One keyframe on an interpolator path.
///
/// Immutable value record, written and read in fixed field order. The knot
/// is the path parameter in `[0, 1]`; a keyframe array forms a valid path
/// when knots are non-decreasing, start at 0.0 and end at 1.0.
///
/// Tension, continuity and bias shape the spline tangents at this keyframe
/// and are ignored for [`InterpolationMode::Linear`] segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TcbKeyFrame {
    pub knot: f32,
    pub mode: InterpolationMode,
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
    pub tension: f32,
    pub continuity: f32,
    pub bias: f32,
}

impl TcbKeyFrame {
    /// Keyframe with default spline shaping (t = c = b = 0).
    #[must_use]
    pub fn new(knot: f32, position: Vec3, orientation: Quat, scale: Vec3) -> Self {
        Self {
            knot,
            mode: InterpolationMode::Spline,
            position,
            orientation,
            scale,
            tension: 0.0,
            continuity: 0.0,
            bias: 0.0,
        }
    }

    #[must_use]
    pub fn linear(knot: f32, position: Vec3, orientation: Quat, scale: Vec3) -> Self {
        Self {
            mode: InterpolationMode::Linear,
            ..Self::new(knot, position, orientation, scale)
        }
    }

    #[must_use]
    pub fn with_tcb(mut self, tension: f32, continuity: f32, bias: f32) -> Self {
        self.tension = tension;
        self.continuity = continuity;
        self.bias = bias;
        self
    }
}
