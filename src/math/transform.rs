//! Transform matrix builders and the forward/up/right basis.
//!
//! Local-space convention (and therefore view-space convention, since a
//! view transform is just an inverse placement): `right` is +X, `up` is
//! +Y and `forward` looks down **-Z**. `right = forward x up`, so a valid
//! basis is right-handed and its placement matrix is a proper rotation.

use super::{Mat4, MathError, Quat, Vec3, vec3};

pub fn translation(v: Vec3) -> Mat4 {
    Mat4::from_rows([
        [1.0, 0.0, 0.0, v.x],
        [0.0, 1.0, 0.0, v.y],
        [0.0, 0.0, 1.0, v.z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Mat4::from_rows([
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, sz, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Rotation of `angle` radians around an arbitrary non-zero `axis`.
pub fn rotation(axis: Vec3, angle: f32) -> Result<Mat4, MathError> {
    Ok(Quat::from_axis_angle(axis, angle)?.to_mat4())
}

fn completed_cross(a: Vec3, b: Vec3) -> Result<Vec3, MathError> {
    let a = a.normalize().map_err(|_| MathError::DegenerateBasis)?;
    let b = b.normalize().map_err(|_| MathError::DegenerateBasis)?;
    a.cross(b).normalize().map_err(|_| MathError::DegenerateBasis)
}

/// `normalize(forward x up)`; fails when the two are not independent.
pub fn direction_right(forward: Vec3, up: Vec3) -> Result<Vec3, MathError> {
    completed_cross(forward, up)
}

/// `normalize(up x right)`.
pub fn direction_forward(up: Vec3, right: Vec3) -> Result<Vec3, MathError> {
    completed_cross(up, right)
}

/// `normalize(right x forward)`.
pub fn direction_up(right: Vec3, forward: Vec3) -> Result<Vec3, MathError> {
    completed_cross(right, forward)
}

/// Mutually-derived unit basis of a placed object.
///
/// Constructible from any two of the three directions; the setters take
/// two and recompute the third, so the triple can never drift apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    forward: Vec3,
    up: Vec3,
    right: Vec3,
}

impl Default for Orientation {
    /// Looking down -Z, +Y up, +X right.
    fn default() -> Self {
        Orientation {
            forward: vec3(0.0, 0.0, -1.0),
            up: vec3(0.0, 1.0, 0.0),
            right: vec3(1.0, 0.0, 0.0),
        }
    }
}

impl Orientation {
    pub fn from_forward_up(forward: Vec3, up: Vec3) -> Result<Orientation, MathError> {
        let right = direction_right(forward, up)?;
        Ok(Orientation {
            forward: forward.normalize().map_err(|_| MathError::DegenerateBasis)?,
            up: up.normalize().map_err(|_| MathError::DegenerateBasis)?,
            right,
        })
    }

    pub fn from_up_right(up: Vec3, right: Vec3) -> Result<Orientation, MathError> {
        let forward = direction_forward(up, right)?;
        Ok(Orientation {
            forward,
            up: up.normalize().map_err(|_| MathError::DegenerateBasis)?,
            right: right.normalize().map_err(|_| MathError::DegenerateBasis)?,
        })
    }

    pub fn from_right_forward(right: Vec3, forward: Vec3) -> Result<Orientation, MathError> {
        let up = direction_up(right, forward)?;
        Ok(Orientation {
            forward: forward.normalize().map_err(|_| MathError::DegenerateBasis)?,
            up,
            right: right.normalize().map_err(|_| MathError::DegenerateBasis)?,
        })
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn set_forward_up(&mut self, forward: Vec3, up: Vec3) -> Result<(), MathError> {
        *self = Orientation::from_forward_up(forward, up)?;
        Ok(())
    }

    pub fn set_up_right(&mut self, up: Vec3, right: Vec3) -> Result<(), MathError> {
        *self = Orientation::from_up_right(up, right)?;
        Ok(())
    }

    pub fn set_right_forward(&mut self, right: Vec3, forward: Vec3) -> Result<(), MathError> {
        *self = Orientation::from_right_forward(right, forward)?;
        Ok(())
    }

    /// Rotate the whole basis by `rot` (a pure rotation matrix).
    pub fn rotated(&self, rot: &Mat4) -> Result<Orientation, MathError> {
        let f = (*rot * self.forward.extend_dir()).xyz();
        let u = (*rot * self.up.extend_dir()).xyz();
        Orientation::from_forward_up(f, u)
    }

    /// Placement rotation: local +X to `right`, +Y to `up`, -Z to
    /// `forward`. Proper rotation by the basis invariant.
    pub fn to_mat4(&self) -> Mat4 {
        let (r, u, f) = (self.right, self.up, self.forward);
        Mat4::from_rows([
            [r.x, u.x, -f.x, 0.0],
            [r.y, u.y, -f.y, 0.0],
            [r.z, u.z, -f.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec4;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_basis_is_orthonormal_identity() {
        let o = Orientation::default();
        assert!(o.forward().dot(o.up()).abs() < 1e-6);
        assert!(o.forward().dot(o.right()).abs() < 1e-6);
        assert!(o.to_mat4().approx_eq(&Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn right_is_forward_cross_up() {
        let o = Orientation::from_forward_up(vec3(0.0, 0.0, -1.0), vec3(0.0, 1.0, 0.0)).unwrap();
        assert!(o.right().approx_eq(vec3(1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn parallel_directions_rejected() {
        assert_eq!(
            Orientation::from_forward_up(vec3(0.0, 1.0, 0.0), vec3(0.0, 2.0, 0.0)),
            Err(MathError::DegenerateBasis)
        );
        assert_eq!(
            direction_right(Vec3::ZERO, vec3(0.0, 1.0, 0.0)),
            Err(MathError::DegenerateBasis)
        );
    }

    #[test]
    fn rotation_around_y_pans_forward() {
        let o = Orientation::default();
        let rot = rotation(vec3(0.0, 1.0, 0.0), FRAC_PI_2).unwrap();
        let o2 = o.rotated(&rot).unwrap();
        // +90 deg around +Y turns a -Z gaze toward -X.
        assert!(o2.forward().approx_eq(vec3(-1.0, 0.0, 0.0), 1e-6));
        assert!(o2.up().approx_eq(vec3(0.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn translation_moves_points() {
        let m = translation(vec3(1.0, 2.0, 3.0));
        assert!((m * vec4(1.0, 1.0, 1.0, 1.0)).approx_eq(vec4(2.0, 3.0, 4.0, 1.0), 1e-6));
        // Directions (w = 0) are unaffected.
        assert!((m * vec4(1.0, 0.0, 0.0, 0.0)).approx_eq(vec4(1.0, 0.0, 0.0, 0.0), 1e-6));
    }
}
