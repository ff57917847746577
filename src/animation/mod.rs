//! Keyframe path animation.
//!
//! Plain keyframe value records plus the sampling routine used by
//! interpolator nodes. Sampling is pure; applying a sample to a live
//! transform group is the universe's job.

pub mod keyframe;
pub mod path;

pub use keyframe::{InterpolationMode, TcbKeyFrame};
pub use path::{sample_path, validate_knots, PathSample};
