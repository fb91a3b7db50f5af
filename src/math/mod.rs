//! Vector / matrix / quaternion math for the rasterization pipeline.
//!
//! Everything works in `f32`. Operations that can fail for degenerate
//! input (`normalize`, `inverse`, basis completion, axis-angle rotation)
//! return a [`MathError`] instead of silently coercing.

mod matrix;
mod plane;
mod quaternion;
mod transform;
mod vector;

pub use matrix::Mat4;
pub use plane::Plane;
pub use quaternion::Quat;
pub use transform::{
    Orientation, direction_forward, direction_right, direction_up, rotation, scaling,
    translation,
};
pub use vector::{Vec2, Vec3, Vec4, vec2, vec3, vec4};

use thiserror::Error;

/// Default tolerance for approximate comparisons (one machine epsilon).
pub const APPROX_EPS: f32 = f32::EPSILON;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,

    #[error("matrix has no inverse (determinant is zero)")]
    Singular,

    #[error("rotation axis has zero length")]
    ZeroAxis,

    #[error("basis directions are parallel or zero, cannot complete")]
    DegenerateBasis,
}

/// Scalar approximate equality with a caller-supplied tolerance.
#[inline]
pub fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}
