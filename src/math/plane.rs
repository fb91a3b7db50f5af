//! Clipping plane: a point on the plane plus its outward normal.

use super::{Vec4, vec4};

/// Half-space boundary. A point is **inside** when its signed distance is
/// `>= 0`: inclusive on the plane itself, so geometry meeting exactly at
/// a clip boundary never opens a seam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub point: Vec4,
    pub normal: Vec4,
}

impl Plane {
    pub const fn new(point: Vec4, normal: Vec4) -> Plane {
        Plane { point, normal }
    }

    /// `(p - point) · normal`, positive on the inside.
    ///
    /// Only the x/y/z components participate; `w` is carried along for
    /// interpolation but is not a spatial coordinate.
    #[inline]
    pub fn signed_distance(&self, p: Vec4) -> f32 {
        (p.x - self.point.x) * self.normal.x
            + (p.y - self.point.y) * self.normal.y
            + (p.z - self.point.z) * self.normal.z
    }

    /// Intersection of the segment `a -> b` with the plane.
    ///
    /// Returns the intersection point and the interpolation parameter
    /// `d` (`0` at `a`, `1` at `b`) so the caller can interpolate
    /// attributes with the same weight. The caller guarantees the segment
    /// actually straddles the plane.
    pub fn line_intersection(&self, a: Vec4, b: Vec4) -> (Vec4, f32) {
        let da = self.signed_distance(a);
        let db = self.signed_distance(b);
        let d = da / (da - db);
        let p = vec4(
            a.x + (b.x - a.x) * d,
            a.y + (b.y - a.y) * d,
            a.z + (b.z - a.z) * d,
            a.w + (b.w - a.w) * d,
        );
        (p, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_plane() -> Plane {
        Plane::new(vec4(0.0, 0.0, 0.0, 1.0), vec4(0.0, 0.0, 1.0, 0.0))
    }

    #[test]
    fn signed_distance_sign_convention() {
        let p = xy_plane();
        assert_eq!(p.signed_distance(vec4(5.0, -2.0, 3.0, 1.0)), 3.0);
        assert_eq!(p.signed_distance(vec4(0.0, 0.0, -1.5, 1.0)), -1.5);
        // Exactly on the plane counts as inside (>= 0).
        assert_eq!(p.signed_distance(vec4(7.0, 7.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn line_intersection_parameter() {
        let p = xy_plane();
        let a = vec4(0.0, 0.0, 2.0, 1.0);
        let b = vec4(4.0, 0.0, -2.0, 1.0);
        let (hit, d) = p.line_intersection(a, b);
        assert_eq!(d, 0.5);
        assert!(hit.approx_eq(vec4(2.0, 0.0, 0.0, 1.0), 1e-6));
    }
}
