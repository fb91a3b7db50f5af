//! Scanline triangle interpolation and Bresenham line walking.
//!
//! Both walkers are geometry-only: they hand every covered sample
//! (x, y, depth, attribute) to a callback and never touch a buffer
//! themselves, so the same stepping serves solid, gradient and textured
//! fills as well as shadow-map depth writes.

use crate::math::Vec3;

/// A projected vertex in window space: integer pixel coordinates with
/// floating depth and the interpolated attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterVertex {
    pub x: i32,
    pub y: i32,
    pub z: f32,
    pub attr: Vec3,
}

/// True when the triangle has zero screen-space area in a degenerate
/// axis-aligned way (all x equal or all y equal). Detected after the
/// screen-space clip; such triangles emit no pixels.
pub fn is_degenerate(v: &[RasterVertex; 3]) -> bool {
    (v[0].x == v[1].x && v[1].x == v[2].x) || (v[0].y == v[1].y && v[1].y == v[2].y)
}

#[derive(Clone, Copy)]
struct Bound {
    x: f32,
    z: f32,
    attr: Vec3,
}

fn edge_at(a: &RasterVertex, b: &RasterVertex, y: i32) -> Bound {
    let s = (y - a.y) as f32 / (b.y - a.y) as f32;
    Bound {
        x: a.x as f32 + (b.x - a.x) as f32 * s,
        z: a.z + (b.z - a.z) * s,
        attr: a.attr.lerp(b.attr, s),
    }
}

fn scanline<F: FnMut(i32, i32, f32, Vec3)>(y: i32, mut l: Bound, mut r: Bound, plot: &mut F) {
    if l.x > r.x {
        std::mem::swap(&mut l, &mut r);
    }
    let xl = l.x.ceil() as i32;
    let xr = r.x.floor() as i32;
    let span = r.x - l.x;
    for x in xl..=xr {
        let t = if span > 0.0 { (x as f32 - l.x) / span } else { 0.0 };
        let z = l.z + (r.z - l.z) * t;
        let attr = l.attr.lerp(r.attr, t);
        plot(x, y, z, attr);
    }
}

/// Walk every pixel of a triangle, top to bottom.
///
/// Splits into a flat-bottom half (highest vertex down to the middle
/// vertex's scanline) and a flat-top half (middle down to the lowest);
/// a zero-height half is skipped. Depth and attributes interpolate
/// linearly along the bounding edges, then across each scanline.
pub fn walk_triangle<F: FnMut(i32, i32, f32, Vec3)>(v: &[RasterVertex; 3], mut plot: F) {
    if is_degenerate(v) {
        return;
    }

    let mut sv = *v;
    sv.sort_by_key(|p| p.y);
    let [v0, v1, v2] = sv;

    // Flat-bottom half between edges v0->v1 and v0->v2.
    if v1.y != v0.y {
        for y in v0.y..=v1.y {
            scanline(y, edge_at(&v0, &v1, y), edge_at(&v0, &v2, y), &mut plot);
        }
    }
    // Flat-top half between edges v1->v2 and v0->v2.
    if v2.y != v1.y {
        for y in v1.y..=v2.y {
            scanline(y, edge_at(&v1, &v2, y), edge_at(&v0, &v2, y), &mut plot);
        }
    }
}

/// Whether pixel `k` of a dashed line is drawn (4 on, 4 off).
#[inline]
pub fn dash_on(k: u32) -> bool {
    (k / 4) % 2 == 0
}

/// Integer Bresenham walk from `a` to `b`.
///
/// Depth and attribute interpolate by step count; the callback also
/// receives the step index so dash patterns can key off it.
pub fn walk_line<F: FnMut(i32, i32, f32, Vec3, u32)>(a: &RasterVertex, b: &RasterVertex, mut plot: F) {
    let (mut x, mut y) = (a.x, a.y);
    let dx = (b.x - a.x).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let dy = -(b.y - a.y).abs();
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;

    let steps = dx.max(-dy) as u32;
    let mut k = 0u32;

    loop {
        let t = if steps > 0 { k as f32 / steps as f32 } else { 0.0 };
        let z = a.z + (b.z - a.z) * t;
        plot(x, y, z, a.attr.lerp(b.attr, t), k);
        if x == b.x && y == b.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec3, vec3};
    use std::collections::HashSet;

    fn rv(x: i32, y: i32, z: f32) -> RasterVertex {
        RasterVertex {
            x,
            y,
            z,
            attr: Vec3::ZERO,
        }
    }

    fn coverage(v: &[RasterVertex; 3]) -> HashSet<(i32, i32)> {
        let mut set = HashSet::new();
        walk_triangle(v, |x, y, _, _| {
            set.insert((x, y));
        });
        set
    }

    #[test]
    fn right_triangle_coverage_is_exact() {
        let set = coverage(&[rv(0, 0, 0.0), rv(4, 0, 0.0), rv(0, 4, 0.0)]);
        let mut expect = HashSet::new();
        for y in 0..=4 {
            for x in 0..=(4 - y) {
                expect.insert((x, y));
            }
        }
        assert_eq!(set, expect);
        assert!(!set.iter().any(|&(x, y)| x > 4 || y > 4));
    }

    #[test]
    fn degenerate_triangles_emit_nothing() {
        // All three share an x.
        assert!(coverage(&[rv(2, 0, 0.0), rv(2, 3, 0.0), rv(2, 7, 0.0)]).is_empty());
        // All three share a y.
        assert!(coverage(&[rv(0, 1, 0.0), rv(3, 1, 0.0), rv(9, 1, 0.0)]).is_empty());
    }

    #[test]
    fn attributes_interpolate_across_the_face() {
        let v = [
            RasterVertex {
                x: 0,
                y: 0,
                z: 0.0,
                attr: vec3(0.0, 0.0, 1.0),
            },
            RasterVertex {
                x: 4,
                y: 0,
                z: 1.0,
                attr: vec3(1.0, 0.0, 1.0),
            },
            RasterVertex {
                x: 0,
                y: 4,
                z: 0.0,
                attr: vec3(0.0, 1.0, 1.0),
            },
        ];
        let mut at_origin = None;
        let mut at_right = None;
        walk_triangle(&v, |x, y, z, attr| {
            if (x, y) == (0, 0) {
                at_origin = Some((z, attr));
            }
            if (x, y) == (4, 0) {
                at_right = Some((z, attr));
            }
        });
        let (z0, a0) = at_origin.unwrap();
        let (z1, a1) = at_right.unwrap();
        assert!(z0.abs() < 1e-6 && a0.approx_eq(vec3(0.0, 0.0, 1.0), 1e-6));
        assert!((z1 - 1.0).abs() < 1e-6 && a1.approx_eq(vec3(1.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn line_hits_both_endpoints_and_interpolates_depth() {
        let mut pts = Vec::new();
        walk_line(&rv(0, 0, 0.0), &rv(4, 0, 1.0), |x, y, z, _, _| {
            pts.push((x, y, z));
        });
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], (0, 0, 0.0));
        assert_eq!(pts[4], (4, 0, 1.0));
        assert!((pts[2].2 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn dash_pattern_is_four_on_four_off() {
        assert!(dash_on(0) && dash_on(3));
        assert!(!dash_on(4) && !dash_on(7));
        assert!(dash_on(8));
    }
}
