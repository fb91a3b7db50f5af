//! Scene: the meshes, lights, camera and texture bank one render call
//! consumes, plus the render-on-change cache.

mod camera;
mod light;

pub use camera::{Camera, CameraKind};
pub use light::{Light, LightKind, SHADOW_MAP_SIZE};

use crate::geometry::Mesh;
use crate::render::color::{Rgba, WHITE};
use crate::render::texture::TextureBank;

/// Runtime knobs of the render core.
#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    /// Fail fast (with coordinates) on out-of-range pixel writes.
    /// Defaults to on in debug builds, off in release.
    pub bounds_checking: bool,
    /// Return the cached frame when nothing changed since the last
    /// render.
    pub render_on_change_only: bool,
    /// Worker tasks for frame packing (row bands).
    pub pack_workers: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            bounds_checking: cfg!(debug_assertions),
            render_on_change_only: false,
            pack_workers: 4,
        }
    }
}

/// Everything one render call reads. Exclusive `&mut self` access makes
/// renders mutually exclusive; callers that share a scene across
/// threads (e.g. a UI resizing the target mid-flight) wrap it in a
/// `Mutex`, which is exactly the scene-level lock the viewer binary
/// takes.
pub struct Scene {
    pub(crate) meshes: Vec<Mesh>,
    pub(crate) lights: Vec<Light>,
    pub(crate) camera: Camera,
    pub(crate) textures: TextureBank,
    pub(crate) background: Rgba,
    pub config: RenderConfig,

    revision: u64,
    pub(crate) rendered_revision: Option<u64>,
    pub(crate) cached_frame: Option<crate::render::Frame>,
}

impl Scene {
    pub fn new(camera: Camera) -> Scene {
        Scene {
            meshes: Vec::new(),
            lights: Vec::new(),
            camera,
            textures: TextureBank::default(),
            background: WHITE,
            config: RenderConfig::default(),
            revision: 0,
            rendered_revision: None,
            cached_frame: None,
        }
    }

    /// Pure dirty check: has any input changed since the last render?
    pub fn is_dirty(&self) -> bool {
        self.rendered_revision != Some(self.effective_revision())
    }

    pub(crate) fn effective_revision(&self) -> u64 {
        // The camera tracks its own mutations; fold them in so a camera
        // move through `camera_mut` never goes unnoticed.
        self.revision.wrapping_add(self.camera.revision())
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /*──────────────────────── content ───────────────────────*/

    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.touch();
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh_mut(&mut self, index: usize) -> &mut Mesh {
        self.touch();
        &mut self.meshes[index]
    }

    pub fn remove_mesh(&mut self, index: usize) -> Mesh {
        self.touch();
        self.meshes.remove(index)
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        self.touch();
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light_mut(&mut self, index: usize) -> &mut Light {
        self.touch();
        &mut self.lights[index]
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn textures(&self) -> &TextureBank {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureBank {
        self.touch();
        &mut self.textures
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn set_background(&mut self, color: Rgba) {
        self.touch();
        self.background = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::cube;
    use crate::geometry::FaceStyle;
    use crate::math::vec3;
    use crate::render::color::RED;

    #[test]
    fn mutation_marks_dirty() {
        let mut scene = Scene::new(Camera::new(CameraKind::Orthogonal));
        scene.rendered_revision = Some(scene.effective_revision());
        assert!(!scene.is_dirty());

        scene.add_mesh(cube(1.0, FaceStyle::solid(RED), RED));
        assert!(scene.is_dirty());

        scene.rendered_revision = Some(scene.effective_revision());
        scene.camera_mut().translate(vec3(0.0, 0.0, 1.0));
        assert!(scene.is_dirty());
    }
}
