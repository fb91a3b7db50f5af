//! Unit quaternions for axis-angle rotation.

use super::{Mat4, MathError, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Rotation of `angle` radians around `axis` (right-hand rule).
    ///
    /// The axis is normalized here; a zero axis is a domain error.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Result<Quat, MathError> {
        let axis = axis.normalize().map_err(|_| MathError::ZeroAxis)?;
        let (s, c) = (angle * 0.5).sin_cos();
        Ok(Quat {
            w: c,
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        })
    }

    /// Hamilton product: `self * rhs` applies `rhs` first.
    pub fn mul(self, rhs: Quat) -> Quat {
        Quat {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }

    pub fn normalize(self) -> Result<Quat, MathError> {
        let n = (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if n == 0.0 {
            return Err(MathError::ZeroLengthVector);
        }
        Ok(Quat {
            w: self.w / n,
            x: self.x / n,
            y: self.y / n,
            z: self.z / n,
        })
    }

    /// Homogeneous rotation matrix of this (unit) quaternion.
    pub fn to_mat4(self) -> Mat4 {
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        Mat4::from_rows([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
                0.0,
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
                0.0,
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{vec3, vec4};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn zero_axis_is_an_error() {
        assert_eq!(
            Quat::from_axis_angle(Vec3::ZERO, 1.0),
            Err(MathError::ZeroAxis)
        );
    }

    #[test]
    fn quarter_turn_around_z() {
        let q = Quat::from_axis_angle(vec3(0.0, 0.0, 1.0), FRAC_PI_2).unwrap();
        let v = q.to_mat4() * vec4(1.0, 0.0, 0.0, 1.0);
        assert!(v.approx_eq(vec4(0.0, 1.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn matches_glam_rotation_matrix() {
        let axis = vec3(0.4, -1.0, 0.3);
        let q = Quat::from_axis_angle(axis, 0.83).unwrap();
        let g = glam::Mat4::from_quat(glam::Quat::from_axis_angle(
            glam::Vec3::new(axis.x, axis.y, axis.z).normalize(),
            0.83,
        ));
        let ours = q.to_mat4();
        for r in 0..4 {
            for c in 0..4 {
                assert!((ours.m[r][c] - g.col(c)[r]).abs() < 1e-6);
            }
        }
    }
}
