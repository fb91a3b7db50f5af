//! The hardcoded primitive meshes the tests and demo scenes are built
//! from. Anything fancier comes in through the OBJ loader.

use super::{Edge, EdgeStyle, Face, FaceStyle, Mesh, MeshFlags, Vertex};
use crate::math::vec3;
use crate::render::color::Rgba;

/// Axis-aligned cube of side `side` centered on the model-space origin.
///
/// Faces wind counter-clockwise seen from outside, so the view-space
/// normal test culls the far side.
pub fn cube(side: f32, style: FaceStyle, edge_color: Rgba) -> Mesh {
    let h = side * 0.5;
    let corners = [
        vec3(-h, -h, -h),
        vec3(h, -h, -h),
        vec3(h, h, -h),
        vec3(-h, h, -h),
        vec3(-h, -h, h),
        vec3(h, -h, h),
        vec3(h, h, h),
        vec3(-h, h, h),
    ];

    const FACES: [[u32; 3]; 12] = [
        [4, 5, 6],
        [4, 6, 7], // +Z
        [1, 0, 3],
        [1, 3, 2], // -Z
        [1, 2, 6],
        [1, 6, 5], // +X
        [0, 4, 7],
        [0, 7, 3], // -X
        [3, 7, 6],
        [3, 6, 2], // +Y
        [0, 1, 5],
        [0, 5, 4], // -Y
    ];

    const EDGES: [[u32; 2]; 12] = [
        [0, 1],
        [1, 5],
        [5, 4],
        [4, 0],
        [3, 2],
        [2, 6],
        [6, 7],
        [7, 3],
        [0, 3],
        [1, 2],
        [5, 6],
        [4, 7],
    ];

    let mut mesh = Mesh::default();
    mesh.vertices = corners.iter().map(|&p| Vertex::new(p)).collect();
    mesh.faces = FACES.iter().map(|&v| Face { v, style }).collect();
    mesh.edges = EDGES
        .iter()
        .map(|&v| Edge {
            v,
            style: EdgeStyle::Solid(edge_color),
        })
        .collect();
    mesh
}

/// Flat rectangle in the model-space XY plane, facing +Z.
///
/// Flagged `FLAT`: both sides render, no back-face culling.
pub fn quad(width: f32, height: f32, style: FaceStyle) -> Mesh {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let mut mesh = Mesh::default();
    mesh.vertices = vec![
        Vertex::new(vec3(-hw, -hh, 0.0)),
        Vertex::new(vec3(hw, -hh, 0.0)),
        Vertex::new(vec3(hw, hh, 0.0)),
        Vertex::new(vec3(-hw, hh, 0.0)),
    ];
    mesh.faces = vec![
        Face {
            v: [0, 1, 2],
            style,
        },
        Face {
            v: [0, 2, 3],
            style,
        },
    ];
    mesh.flags |= MeshFlags::FLAT;
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::{RED, WHITE};

    #[test]
    fn cube_winding_points_outward() {
        let m = cube(2.0, FaceStyle::solid(RED), WHITE);
        assert_eq!(m.faces.len(), 12);
        assert_eq!(m.edges.len(), 12);
        for f in &m.faces {
            let p1 = m.vertices[f.v[0] as usize].position.xyz();
            let p2 = m.vertices[f.v[1] as usize].position.xyz();
            let p3 = m.vertices[f.v[2] as usize].position.xyz();
            let n = (p2 - p1).cross(p3 - p1);
            let center = (p1 + p2 + p3) / 3.0;
            // Outward: normal points away from the cube center.
            assert!(n.dot(center) > 0.0, "face {:?} winds inward", f.v);
        }
    }

    #[test]
    fn quad_is_flat() {
        let m = quad(2.0, 1.0, FaceStyle::solid(RED));
        assert!(m.flags.contains(MeshFlags::FLAT));
        assert_eq!(m.faces.len(), 2);
    }
}
