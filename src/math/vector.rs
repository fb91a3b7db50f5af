//! 2/3/4-component vectors.
//!
//! `Vec4` carries the homogeneous `w` used by the perspective divide.

use super::{MathError, approx_eq};
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[inline]
pub const fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2 { x, y }
}

#[inline]
pub const fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3 { x, y, z }
}

#[inline]
pub const fn vec4(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
    Vec4 { x, y, z, w }
}

macro_rules! impl_vec_ops {
    ($t:ty { $($f:ident),+ }) => {
        impl Add for $t {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($f: self.$f + rhs.$f),+ }
            }
        }

        impl Sub for $t {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($f: self.$f - rhs.$f),+ }
            }
        }

        impl Neg for $t {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($f: -self.$f),+ }
            }
        }

        impl Mul<f32> for $t {
            type Output = Self;
            #[inline]
            fn mul(self, s: f32) -> Self {
                Self { $($f: self.$f * s),+ }
            }
        }

        impl Div<f32> for $t {
            type Output = Self;
            #[inline]
            fn div(self, s: f32) -> Self {
                Self { $($f: self.$f / s),+ }
            }
        }

        impl $t {
            pub const ZERO: Self = Self { $($f: 0.0),+ };

            #[inline]
            pub fn dot(self, rhs: Self) -> f32 {
                0.0 $(+ self.$f * rhs.$f)+
            }

            #[inline]
            pub fn length_squared(self) -> f32 {
                self.dot(self)
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Unit vector in the same direction; fails for the zero vector.
            pub fn normalize(self) -> Result<Self, MathError> {
                let len = self.length();
                if len == 0.0 {
                    return Err(MathError::ZeroLengthVector);
                }
                Ok(self / len)
            }

            /// Component-wise approximate equality with tolerance `eps`.
            #[inline]
            pub fn approx_eq(self, rhs: Self, eps: f32) -> bool {
                true $(&& approx_eq(self.$f, rhs.$f, eps))+
            }

            /// Linear interpolation: `self` at `t = 0`, `rhs` at `t = 1`.
            #[inline]
            pub fn lerp(self, rhs: Self, t: f32) -> Self {
                self + (rhs - self) * t
            }
        }
    };
}

impl_vec_ops!(Vec2 { x, y });
impl_vec_ops!(Vec3 { x, y, z });
impl_vec_ops!(Vec4 { x, y, z, w });

impl Vec3 {
    #[inline]
    pub fn cross(self, rhs: Self) -> Self {
        vec3(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Homogeneous point with `w = 1`.
    #[inline]
    pub fn extend_point(self) -> Vec4 {
        vec4(self.x, self.y, self.z, 1.0)
    }

    /// Homogeneous direction with `w = 0`.
    #[inline]
    pub fn extend_dir(self) -> Vec4 {
        vec4(self.x, self.y, self.z, 0.0)
    }
}

impl Vec4 {
    #[inline]
    pub fn xyz(self) -> Vec3 {
        vec3(self.x, self.y, self.z)
    }

    /// Divide x, y, z by the homogeneous `w`.
    ///
    /// `w` must be non-zero; the view-frustum near plane guarantees that
    /// for everything the pipeline projects.
    #[inline]
    pub fn perspective_divide(self) -> Vec4 {
        vec4(self.x / self.w, self.y / self.w, self.z / self.w, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_and_cross() {
        let a = vec3(1.0, 0.0, 0.0);
        let b = vec3(0.0, 1.0, 0.0);
        assert_eq!(a.dot(b), 0.0);
        assert_eq!(a.cross(b), vec3(0.0, 0.0, 1.0));
        assert_eq!(b.cross(a), vec3(0.0, 0.0, -1.0));
    }

    #[test]
    fn normalize_rejects_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Err(MathError::ZeroLengthVector));
        let v = vec3(3.0, 0.0, 4.0).normalize().unwrap();
        assert!(approx_eq(v.length(), 1.0, 1e-6));
    }

    #[test]
    fn approx_eq_uses_caller_eps() {
        let a = vec2(1.0, 2.0);
        let b = vec2(1.0 + 1e-5, 2.0);
        assert!(!a.approx_eq(b, 1e-6));
        assert!(a.approx_eq(b, 1e-4));
    }

    #[test]
    fn perspective_divide_scales_xyz() {
        let p = vec4(2.0, 4.0, 6.0, 2.0).perspective_divide();
        assert_eq!(p, vec4(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn matches_glam_cross() {
        let a = vec3(1.3, -2.0, 0.5);
        let b = vec3(0.2, 4.0, -1.0);
        let g = glam::Vec3::new(1.3, -2.0, 0.5).cross(glam::Vec3::new(0.2, 4.0, -1.0));
        let c = a.cross(b);
        assert!(c.approx_eq(vec3(g.x, g.y, g.z), 1e-6));
    }
}
