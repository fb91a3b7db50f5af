//! The per-view transform -> cull -> clip -> project -> rasterize chain,
//! shared by the main camera pass and the per-light shadow pass.

use std::collections::VecDeque;

use crate::geometry::{EdgeStyle, FaceStyle, Mesh, MeshFlags};
use crate::math::{Mat4, Plane, Vec3, Vec4, vec3, vec4};
use crate::render::buffer::RenderTarget;
use crate::render::clip::{
    ClipSegment, ClipTriangle, ClipVertex, SCREEN_PLANES, Shading, clip_edges, clip_triangles,
};
use crate::render::color::{Rgba, channels, rgb};
use crate::render::raster::{RasterVertex, dash_on, is_degenerate, walk_line, walk_triangle};
use crate::render::texture::TextureBank;
use crate::scene::{Camera, Light};

/// Bounding-box outline color.
const OUTLINE_COLOR: Rgba = rgb(0xFF, 0x80, 0x00);

/// Everything a render pass needs to know about the viewing object,
/// built once per pass from a camera or a light.
pub(crate) struct ViewContext {
    pub world_to_view: Mat4,
    pub view_to_world: Mat4,
    pub view_to_screen: Mat4,
    pub planes: [Plane; 6],
    pub perspective: bool,
    pub view_width: f32,
    pub view_height: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Target pixel dimensions.
    pub width: usize,
    pub height: usize,
}

impl ViewContext {
    pub fn from_camera(cam: &Camera, width: usize, height: usize) -> ViewContext {
        let (view_width, view_height) = cam.view_size();
        let (z_near, z_far) = cam.z_range();
        ViewContext {
            world_to_view: *cam.world_to_view(),
            view_to_world: *cam.view_to_world(),
            view_to_screen: *cam.view_to_screen(),
            planes: *cam.frustum_planes(),
            perspective: cam.kind().uses_perspective_divide(),
            view_width,
            view_height,
            z_near,
            z_far,
            width,
            height,
        }
    }

    pub fn from_light(light: &Light) -> ViewContext {
        let (view_width, view_height, z_near, z_far) = light.view_volume();
        ViewContext {
            world_to_view: *light.world_to_view(),
            // The shadow pass never unprojects; identity is fine here.
            view_to_world: Mat4::IDENTITY,
            view_to_screen: *light.view_to_screen(),
            planes: *light.frustum_planes(),
            perspective: light.kind().uses_perspective_divide(),
            view_width,
            view_height,
            z_near,
            z_far,
            width: light.shadow_map().width(),
            height: light.shadow_map().height(),
        }
    }

    /// NDC -1..=1 onto pixel 0..=dim-1 (y up; the vertical flip happens
    /// once, at frame packing).
    pub fn screen_to_window(&self) -> Mat4 {
        let sx = 0.5 * (self.width.max(1) - 1) as f32;
        let sy = 0.5 * (self.height.max(1) - 1) as f32;
        Mat4::from_rows([
            [sx, 0.0, 0.0, sx],
            [0.0, sy, 0.0, sy],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    #[inline]
    fn to_window(&self, v: &ClipVertex) -> RasterVertex {
        let sx = 0.5 * (self.width.max(1) - 1) as f32;
        let sy = 0.5 * (self.height.max(1) - 1) as f32;
        RasterVertex {
            x: ((v.pos.x + 1.0) * sx).round() as i32,
            y: ((v.pos.y + 1.0) * sy).round() as i32,
            z: v.pos.z,
            attr: v.attr,
        }
    }
}

/// View-space plane normal of a triangle (not normalized; only the
/// direction matters for the facing test).
#[inline]
pub(crate) fn normal_from_points(p1: Vec4, p2: Vec4, p3: Vec4) -> Vec3 {
    (p2.xyz() - p1.xyz()).cross(p3.xyz() - p1.xyz())
}

/// Run one mesh's faces through the full chain, handing every surviving
/// window-space triangle to `emit`.
///
/// Stages: model -> view, back-face cull (flat meshes exempt), clip
/// against the view frustum, project (perspective-dividing position and
/// texture coordinates), clip against the canonical screen cube, skip
/// degenerates, map to pixels.
pub(crate) fn each_window_triangle<F>(ctx: &ViewContext, mesh: &Mesh, mut emit: F)
where
    F: FnMut(&[RasterVertex; 3], Shading),
{
    let model_to_view = ctx.world_to_view * mesh.model_to_world();
    let flat = mesh.flags.contains(MeshFlags::FLAT);
    let mut queue: VecDeque<ClipTriangle> = VecDeque::new();

    for face in &mesh.faces {
        let p = [
            model_to_view * mesh.vertices[face.v[0] as usize].position,
            model_to_view * mesh.vertices[face.v[1] as usize].position,
            model_to_view * mesh.vertices[face.v[2] as usize].position,
        ];

        // Back-face cull: normal pointing away from the viewer.
        let normal = normal_from_points(p[0], p[1], p[2]);
        let front_facing = p[0].xyz().dot(normal) < 0.0;
        if !flat && !front_facing {
            continue;
        }

        let (shading, attr) = resolve_style(&face.style, front_facing);
        queue.clear();
        queue.push_back(ClipTriangle {
            v: [
                ClipVertex { pos: p[0], attr: attr[0] },
                ClipVertex { pos: p[1], attr: attr[1] },
                ClipVertex { pos: p[2], attr: attr[2] },
            ],
            shading,
        });

        if !clip_triangles(&mut queue, &ctx.planes) {
            continue;
        }

        for _ in 0..queue.len() {
            let mut tri = queue.pop_front().expect("tracked queue length");
            for v in &mut tri.v {
                let projected = ctx.view_to_screen * v.pos;
                if ctx.perspective {
                    if let Shading::Textured(_) = tri.shading {
                        v.attr = v.attr / projected.w;
                    }
                    v.pos = projected.perspective_divide();
                } else {
                    v.pos = projected;
                }
            }
            queue.push_back(tri);
        }

        if !clip_triangles(&mut queue, &SCREEN_PLANES[..]) {
            continue;
        }

        while let Some(tri) = queue.pop_front() {
            let wv = [
                ctx.to_window(&tri.v[0]),
                ctx.to_window(&tri.v[1]),
                ctx.to_window(&tri.v[2]),
            ];
            if is_degenerate(&wv) {
                continue;
            }
            emit(&wv, tri.shading);
        }
    }
}

/// Seed the clip attribute and pick the shading for one face.
fn resolve_style(style: &FaceStyle, front_facing: bool) -> (Shading, [Vec3; 3]) {
    match *style {
        FaceStyle::Solid { front, back } => {
            let c = if front_facing { front } else { back };
            (Shading::Solid(c), [Vec3::ZERO; 3])
        }
        FaceStyle::Gradient { c1, c2, c3 } => {
            let ch = |c: Rgba| {
                let (r, g, b) = channels(c);
                vec3(r as f32, g as f32, b as f32)
            };
            (Shading::Gradient, [ch(c1), ch(c2), ch(c3)])
        }
        FaceStyle::Textured { t, texture } => (
            Shading::Textured(texture),
            [
                vec3(t[0].x, t[0].y, 1.0),
                vec3(t[1].x, t[1].y, 1.0),
                vec3(t[2].x, t[2].y, 1.0),
            ],
        ),
    }
}

/// Face pass: rasterize every visible mesh into the depth/color target.
pub(crate) fn draw_faces(ctx: &ViewContext, meshes: &[Mesh], textures: &TextureBank, target: &mut RenderTarget) {
    for mesh in meshes {
        if !mesh.flags.contains(MeshFlags::DRAW_FACES) {
            continue;
        }
        each_window_triangle(ctx, mesh, |wv, shading| {
            walk_triangle(wv, |x, y, z, attr| {
                let color = shade(shading, attr, textures);
                target.plot(x, y, z, color);
            });
        });
    }
}

#[inline]
fn shade(shading: Shading, attr: Vec3, textures: &TextureBank) -> Rgba {
    match shading {
        Shading::Solid(c) => c,
        Shading::Gradient => rgb(attr.x as u8, attr.y as u8, attr.z as u8),
        Shading::Textured(id) => {
            // attr = (u/w, v/w, 1/w); the third channel undoes the
            // perspective divide (it is exactly 1 for orthogonal views).
            let tex = textures.get(id);
            tex.sample(attr.x / attr.z, attr.y / attr.z)
        }
    }
}

/// Wireframe pass: clip and walk every styled edge.
pub(crate) fn draw_edges(ctx: &ViewContext, meshes: &[Mesh], target: &mut RenderTarget) {
    for mesh in meshes {
        if !mesh.flags.contains(MeshFlags::DRAW_EDGES) {
            continue;
        }
        let model_to_view = ctx.world_to_view * mesh.model_to_world();
        for edge in &mesh.edges {
            let (ca, cb) = match edge.style {
                EdgeStyle::Solid(c) | EdgeStyle::Dashed(c) => (c, c),
                EdgeStyle::Gradient(a, b) => (a, b),
            };
            let seg = ClipSegment {
                a: ClipVertex {
                    pos: model_to_view * mesh.vertices[edge.v[0] as usize].position,
                    attr: color_attr(ca),
                },
                b: ClipVertex {
                    pos: model_to_view * mesh.vertices[edge.v[1] as usize].position,
                    attr: color_attr(cb),
                },
            };
            let dashed = matches!(edge.style, EdgeStyle::Dashed(_));
            draw_view_segment(ctx, seg, dashed, target);
        }
    }
}

/// Outline pass: the world-space bounding box of flagged meshes.
pub(crate) fn draw_outlines(ctx: &ViewContext, meshes: &[Mesh], target: &mut RenderTarget) {
    for mesh in meshes {
        if !mesh.flags.contains(MeshFlags::DRAW_OUTLINE) {
            continue;
        }
        let Some((lo, hi)) = mesh.world_bounds() else {
            continue;
        };
        let corner = |x: f32, y: f32, z: f32| {
            ctx.world_to_view * vec4(x, y, z, 1.0)
        };
        let c = [
            corner(lo.x, lo.y, lo.z),
            corner(hi.x, lo.y, lo.z),
            corner(hi.x, hi.y, lo.z),
            corner(lo.x, hi.y, lo.z),
            corner(lo.x, lo.y, hi.z),
            corner(hi.x, lo.y, hi.z),
            corner(hi.x, hi.y, hi.z),
            corner(lo.x, hi.y, hi.z),
        ];
        const BOX_EDGES: [[usize; 2]; 12] = [
            [0, 1],
            [1, 2],
            [2, 3],
            [3, 0],
            [4, 5],
            [5, 6],
            [6, 7],
            [7, 4],
            [0, 4],
            [1, 5],
            [2, 6],
            [3, 7],
        ];
        for [i, j] in BOX_EDGES {
            let seg = ClipSegment {
                a: ClipVertex {
                    pos: c[i],
                    attr: color_attr(OUTLINE_COLOR),
                },
                b: ClipVertex {
                    pos: c[j],
                    attr: color_attr(OUTLINE_COLOR),
                },
            };
            draw_view_segment(ctx, seg, false, target);
        }
    }
}

#[inline]
fn color_attr(c: Rgba) -> Vec3 {
    let (r, g, b) = channels(c);
    vec3(r as f32, g as f32, b as f32)
}

/// Clip one view-space segment, project it, and walk its pixels with
/// the same depth compare-and-write rule as faces.
fn draw_view_segment(ctx: &ViewContext, mut seg: ClipSegment, dashed: bool, target: &mut RenderTarget) {
    if !clip_edges(&ctx.planes, &mut seg) {
        return;
    }
    for v in [&mut seg.a, &mut seg.b] {
        let projected = ctx.view_to_screen * v.pos;
        v.pos = if ctx.perspective {
            projected.perspective_divide()
        } else {
            projected
        };
    }
    if !clip_edges(&SCREEN_PLANES[..], &mut seg) {
        return;
    }
    let a = ctx.to_window(&seg.a);
    let b = ctx.to_window(&seg.b);
    walk_line(&a, &b, |x, y, z, attr, k| {
        if dashed && !dash_on(k) {
            return;
        }
        target.plot(x, y, z, rgb(attr.x as u8, attr.y as u8, attr.z as u8));
    });
}
