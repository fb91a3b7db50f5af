//! Half-space clipping of segments and triangles.
//!
//! Distance `>= 0` counts as inside, so geometry exactly on a plane is
//! kept; adjacent clip regions share their boundary and never open a
//! seam. A triangle straddling a plane splits into 1 or 2 triangles
//! with position *and* attribute interpolation driven by the same
//! parameter `d`.

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use smallvec::SmallVec;

use crate::math::{Plane, Vec3, Vec4, vec4};
use crate::render::color::Rgba;
use crate::render::texture::TextureId;

/// Position plus the interpolated attribute (texture coordinates or
/// gradient color channels, depending on the shading).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    pub pos: Vec4,
    pub attr: Vec3,
}

impl ClipVertex {
    #[inline]
    pub fn lerp(self, other: ClipVertex, d: f32) -> ClipVertex {
        ClipVertex {
            pos: self.pos.lerp(other.pos, d),
            attr: self.attr.lerp(other.attr, d),
        }
    }
}

/// How the rasterizer turns an interpolated attribute into a color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shading {
    /// One flat color for the whole triangle.
    Solid(Rgba),
    /// Attribute carries (r, g, b) channels.
    Gradient,
    /// Attribute carries (u/w, v/w, 1/w), or (u, v, 1) before any
    /// perspective divide.
    Textured(TextureId),
}

/// One triangle in flight through the clipping stages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipTriangle {
    pub v: [ClipVertex; 3],
    pub shading: Shading,
}

/// A wireframe segment in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipSegment {
    pub a: ClipVertex,
    pub b: ClipVertex,
}

/// Clip one segment against one plane.
///
/// Both endpoints inside (inclusive): kept unchanged. Both outside:
/// discarded (`false`). Straddling: the outside endpoint is replaced by
/// the plane intersection, attributes interpolated by `d`.
pub fn clip_edge(plane: &Plane, seg: &mut ClipSegment) -> bool {
    let da = plane.signed_distance(seg.a.pos);
    let db = plane.signed_distance(seg.b.pos);
    if da >= 0.0 && db >= 0.0 {
        return true;
    }
    if da < 0.0 && db < 0.0 {
        return false;
    }
    let (_, d) = plane.line_intersection(seg.a.pos, seg.b.pos);
    let hit = seg.a.lerp(seg.b, d);
    if da < 0.0 {
        seg.a = hit;
    } else {
        seg.b = hit;
    }
    true
}

/// Clip against every plane in order, short-circuiting on full rejection.
pub fn clip_edges(planes: &[Plane], seg: &mut ClipSegment) -> bool {
    planes.iter().all(|p| clip_edge(p, seg))
}

/// Clip one triangle against one plane, appending 0-2 triangles to `out`.
///
/// Style is copied unchanged onto derived triangles.
pub fn clip_triangle(tri: &ClipTriangle, plane: &Plane, out: &mut SmallVec<[ClipTriangle; 2]>) {
    let d: [f32; 3] = [
        plane.signed_distance(tri.v[0].pos),
        plane.signed_distance(tri.v[1].pos),
        plane.signed_distance(tri.v[2].pos),
    ];
    let mut inside: SmallVec<[usize; 3]> = SmallVec::new();
    let mut outside: SmallVec<[usize; 3]> = SmallVec::new();
    for i in 0..3 {
        if d[i] >= 0.0 {
            inside.push(i);
        } else {
            outside.push(i);
        }
    }

    let cut = |from: usize, to: usize| -> ClipVertex {
        let (_, t) = plane.line_intersection(tri.v[from].pos, tri.v[to].pos);
        tri.v[from].lerp(tri.v[to], t)
    };

    match inside.len() {
        0 => {}
        3 => out.push(*tri),
        1 => {
            // One survivor: it plus the two cut points toward the others.
            let a = inside[0];
            let (b, c) = ((a + 1) % 3, (a + 2) % 3);
            out.push(ClipTriangle {
                v: [tri.v[a], cut(a, b), cut(a, c)],
                shading: tri.shading,
            });
        }
        _ => {
            // Two survivors: the inside quadrilateral, fanned from the
            // first survivor in winding order.
            let o = outside[0];
            let (a, b) = ((o + 1) % 3, (o + 2) % 3);
            let cut_ba = cut(b, o);
            let cut_oa = cut(a, o);
            out.push(ClipTriangle {
                v: [tri.v[a], tri.v[b], cut_ba],
                shading: tri.shading,
            });
            out.push(ClipTriangle {
                v: [tri.v[a], cut_ba, cut_oa],
                shading: tri.shading,
            });
        }
    }
}

/// Clip the whole queue against every plane (dequeue-and-requeue per
/// plane). Returns `false` iff everything was culled.
pub fn clip_triangles(queue: &mut VecDeque<ClipTriangle>, planes: &[Plane]) -> bool {
    let mut scratch: SmallVec<[ClipTriangle; 2]> = SmallVec::new();
    for plane in planes {
        for _ in 0..queue.len() {
            let tri = queue.pop_front().expect("tracked queue length");
            scratch.clear();
            clip_triangle(&tri, plane, &mut scratch);
            queue.extend(scratch.drain(..));
        }
        if queue.is_empty() {
            return false;
        }
    }
    !queue.is_empty()
}

/// The canonical screen-space clip cube: NDC -1..=1 on every axis.
pub static SCREEN_PLANES: Lazy<[Plane; 6]> = Lazy::new(|| {
    let p = |px, py, pz, nx, ny, nz| {
        Plane::new(vec4(px, py, pz, 1.0), vec4(nx, ny, nz, 0.0))
    };
    [
        p(-1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0, -1.0, 0.0, 0.0),
        p(0.0, -1.0, 0.0, 0.0, 1.0, 0.0),
        p(0.0, 1.0, 0.0, 0.0, -1.0, 0.0),
        p(0.0, 0.0, -1.0, 0.0, 0.0, 1.0),
        p(0.0, 0.0, 1.0, 0.0, 0.0, -1.0),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;
    use crate::render::color::RED;

    fn v(x: f32, y: f32, z: f32) -> ClipVertex {
        ClipVertex {
            pos: vec4(x, y, z, 1.0),
            attr: vec3(x, y, 0.0),
        }
    }

    fn xy_plane() -> Plane {
        // Keeps z >= 0.
        Plane::new(vec4(0.0, 0.0, 0.0, 1.0), vec4(0.0, 0.0, 1.0, 0.0))
    }

    fn tri(a: ClipVertex, b: ClipVertex, c: ClipVertex) -> ClipTriangle {
        ClipTriangle {
            v: [a, b, c],
            shading: Shading::Solid(RED),
        }
    }

    fn area(t: &ClipTriangle) -> f32 {
        let a = t.v[0].pos.xyz();
        let b = t.v[1].pos.xyz();
        let c = t.v[2].pos.xyz();
        (b - a).cross(c - a).length() * 0.5
    }

    #[test]
    fn fully_inside_is_unchanged() {
        let t = tri(v(0.0, 0.0, 1.0), v(1.0, 0.0, 2.0), v(0.0, 1.0, 3.0));
        let mut out = SmallVec::new();
        clip_triangle(&t, &xy_plane(), &mut out);
        assert_eq!(out.as_slice(), &[t]);
    }

    #[test]
    fn fully_outside_is_discarded() {
        let t = tri(v(0.0, 0.0, -1.0), v(1.0, 0.0, -2.0), v(0.0, 1.0, -3.0));
        let mut out = SmallVec::new();
        clip_triangle(&t, &xy_plane(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn one_inside_yields_one_triangle() {
        // Vertex 0 at z = 1, others at z = -1: cut at z = 0.
        let t = tri(v(0.0, 0.0, 1.0), v(2.0, 0.0, -1.0), v(0.0, 2.0, -1.0));
        let mut out = SmallVec::new();
        clip_triangle(&t, &xy_plane(), &mut out);
        assert_eq!(out.len(), 1);
        for vert in &out[0].v {
            assert!(vert.pos.z >= 0.0);
        }
        // Cut midway: attributes follow the same parameter.
        assert!(out[0].v[1].attr.approx_eq(vec3(1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn two_inside_yield_two_triangles_conserving_area() {
        let t = tri(v(0.0, 0.0, 1.0), v(2.0, 0.0, 1.0), v(0.0, 2.0, -1.0));
        let mut out = SmallVec::new();
        clip_triangle(&t, &xy_plane(), &mut out);
        assert_eq!(out.len(), 2);
        // The whole triangle spans z 1 -> -1; the inside part is the
        // quadrilateral above z = 0, i.e. 3/4 of the area.
        let total: f32 = out.iter().map(area).sum();
        assert!((total - area(&t) * 0.75).abs() < 1e-5);
    }

    #[test]
    fn edge_on_plane_kept_unchanged() {
        let mut seg = ClipSegment {
            a: v(0.0, 0.0, 0.0),
            b: v(1.0, 0.0, 0.0),
        };
        let before = seg;
        assert!(clip_edge(&xy_plane(), &mut seg));
        assert_eq!(seg, before);
    }

    #[test]
    fn straddling_edge_is_shortened() {
        let mut seg = ClipSegment {
            a: v(0.0, 0.0, 2.0),
            b: v(0.0, 0.0, -2.0),
        };
        assert!(clip_edge(&xy_plane(), &mut seg));
        assert_eq!(seg.a.pos.z, 2.0);
        assert!(seg.b.pos.approx_eq(vec4(0.0, 0.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn queue_reports_full_cull() {
        let mut q = VecDeque::new();
        q.push_back(tri(v(0.0, 0.0, -1.0), v(1.0, 0.0, -2.0), v(0.0, 1.0, -3.0)));
        assert!(!clip_triangles(&mut q, &[xy_plane()]));
        assert!(q.is_empty());

        let mut q = VecDeque::new();
        q.push_back(tri(v(0.0, 0.0, 1.0), v(2.0, 0.0, -1.0), v(0.0, 2.0, -1.0)));
        assert!(clip_triangles(&mut q, &[xy_plane()]));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn screen_cube_keeps_ndc_interior() {
        let mut q = VecDeque::new();
        q.push_back(tri(
            v(-0.5, -0.5, 0.0),
            v(0.5, -0.5, 0.0),
            v(0.0, 0.5, 0.0),
        ));
        assert!(clip_triangles(&mut q, &SCREEN_PLANES[..]));
        assert_eq!(q.len(), 1);
    }
}
