//! Mesh data: a vertex arena plus index-based faces and edges.
//!
//! Faces and edges hold indices into the owning mesh's vertex arena, so
//! cloning or joining meshes can never alias shared vertex objects.
//! Vertices are pure data; transformed positions live in per-pass
//! scratch, never on the vertex.

use bitflags::bitflags;

use crate::math::{Mat4, MathError, Orientation, Vec3, Vec4, rotation, scaling, translation};
use crate::render::color::Rgba;
use crate::render::texture::TextureId;

pub type VertexId = u32;

/// Model-space position (w = 1) plus an optional normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec4,
    pub normal: Option<Vec3>,
}

impl Vertex {
    pub fn new(p: Vec3) -> Vertex {
        Vertex {
            position: p.extend_point(),
            normal: None,
        }
    }

    pub fn with_normal(p: Vec3, n: Vec3) -> Vertex {
        Vertex {
            position: p.extend_point(),
            normal: Some(n),
        }
    }
}

/// Render style of one triangle.
///
/// The textured variant carries exactly three texture-space coordinates,
/// one per position vertex, by construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FaceStyle {
    Solid { front: Rgba, back: Rgba },
    Gradient { c1: Rgba, c2: Rgba, c3: Rgba },
    Textured { t: [Vec3; 3], texture: TextureId },
}

impl FaceStyle {
    pub fn solid(color: Rgba) -> FaceStyle {
        FaceStyle::Solid {
            front: color,
            back: color,
        }
    }
}

/// Triangle: three arena indices plus a style. The unit of clipping and
/// rasterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub v: [VertexId; 3],
    pub style: FaceStyle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeStyle {
    Solid(Rgba),
    Dashed(Rgba),
    Gradient(Rgba, Rgba),
}

/// Wireframe segment: two arena indices plus a draw style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub v: [VertexId; 2],
    pub style: EdgeStyle,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MeshFlags: u8 {
        const DRAW_FACES   = 1 << 0;
        const DRAW_EDGES   = 1 << 1;
        const CAST_SHADOWS = 1 << 2;
        const DRAW_OUTLINE = 1 << 3;
        /// Flat 2D mesh: exempt from back-face culling.
        const FLAT         = 1 << 4;
    }
}

impl Default for MeshFlags {
    fn default() -> Self {
        MeshFlags::DRAW_FACES | MeshFlags::CAST_SHADOWS
    }
}

/// Geometry aggregate with its object-to-world placement.
///
/// The vertex/edge/face arrays are fixed after construction except for
/// explicit `join`; placement mutates only origin/orientation/scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub faces: Vec<Face>,
    pub origin: Vec3,
    pub orientation: Orientation,
    pub scale: Vec3,
    pub flags: MeshFlags,
}

impl Default for Mesh {
    fn default() -> Self {
        Mesh {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            origin: Vec3::ZERO,
            orientation: Orientation::default(),
            scale: crate::math::vec3(1.0, 1.0, 1.0),
            flags: MeshFlags::default(),
        }
    }
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// `T(origin) * R(orientation) * S(scale)`.
    pub fn model_to_world(&self) -> Mat4 {
        translation(self.origin)
            * self.orientation.to_mat4()
            * scaling(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn translate(&mut self, v: Vec3) {
        self.origin = self.origin + v;
    }

    pub fn scale_by(&mut self, factor: f32) {
        self.scale = self.scale * factor;
    }

    /// Rotate the placement around an arbitrary axis through the origin.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) -> Result<(), MathError> {
        let rot = rotation(axis, angle)?;
        self.orientation = self.orientation.rotated(&rot)?;
        Ok(())
    }

    /// Apply `style` to every face.
    pub fn set_face_style(&mut self, style: FaceStyle) {
        for f in &mut self.faces {
            f.style = style;
        }
    }

    /// Concatenate `other`'s arenas onto this mesh, remapping indices.
    ///
    /// `other`'s geometry is taken in its model space; placements are not
    /// composed.
    pub fn join(&mut self, other: &Mesh) {
        let base = self.vertices.len() as VertexId;
        self.vertices.extend_from_slice(&other.vertices);
        self.edges.extend(other.edges.iter().map(|e| Edge {
            v: [e.v[0] + base, e.v[1] + base],
            style: e.style,
        }));
        self.faces.extend(other.faces.iter().map(|f| Face {
            v: [f.v[0] + base, f.v[1] + base, f.v[2] + base],
            style: f.style,
        }));
    }

    /// World-space axis-aligned bounding box, if the mesh has vertices.
    pub fn world_bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.vertices.is_empty() {
            return None;
        }
        let m = self.model_to_world();
        let mut lo = crate::math::vec3(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut hi = -lo;
        for v in &self.vertices {
            let p: Vec4 = m * v.position;
            lo = crate::math::vec3(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z));
            hi = crate::math::vec3(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z));
        }
        Some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{vec3, vec4};
    use crate::render::color::RED;

    fn tri_mesh() -> Mesh {
        let mut m = Mesh::default();
        m.vertices = vec![
            Vertex::new(vec3(0.0, 0.0, 0.0)),
            Vertex::new(vec3(1.0, 0.0, 0.0)),
            Vertex::new(vec3(0.0, 1.0, 0.0)),
        ];
        m.faces = vec![Face {
            v: [0, 1, 2],
            style: FaceStyle::solid(RED),
        }];
        m.edges = vec![Edge {
            v: [0, 1],
            style: EdgeStyle::Solid(RED),
        }];
        m
    }

    #[test]
    fn join_remaps_indices() {
        let mut a = tri_mesh();
        let b = tri_mesh();
        a.join(&b);
        assert_eq!(a.vertices.len(), 6);
        assert_eq!(a.faces[1].v, [3, 4, 5]);
        assert_eq!(a.edges[1].v, [3, 4]);
    }

    #[test]
    fn model_to_world_applies_scale_then_placement() {
        let mut m = tri_mesh();
        m.translate(vec3(10.0, 0.0, 0.0));
        m.scale_by(2.0);
        let w = m.model_to_world() * vec4(1.0, 0.0, 0.0, 1.0);
        assert!(w.approx_eq(vec4(12.0, 0.0, 0.0, 1.0), 1e-5));
    }

    #[test]
    fn rotate_rejects_zero_axis() {
        let mut m = tri_mesh();
        assert!(m.rotate(Vec3::ZERO, 1.0).is_err());
    }

    #[test]
    fn world_bounds_follow_translation() {
        let mut m = tri_mesh();
        m.translate(vec3(5.0, 5.0, 5.0));
        let (lo, hi) = m.world_bounds().unwrap();
        assert!(lo.approx_eq(vec3(5.0, 5.0, 5.0), 1e-5));
        assert!(hi.approx_eq(vec3(6.0, 6.0, 5.0), 1e-5));
    }
}
