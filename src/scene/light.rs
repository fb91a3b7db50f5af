//! Lights: camera-like view machinery plus a private shadow map.

use crate::math::{Mat4, MathError, Orientation, Plane, Vec3, translation, vec4};
use crate::render::buffer::{Buffer2D, DEPTH_FAR};
use crate::render::color::Rgba;

use super::camera::{frustum_planes, view_to_screen};

/// Closed set of light kinds; capability methods replace per-type
/// branching in the shadow and lighting passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

impl LightKind {
    /// Point and spot lights project perspectively; directional light
    /// rays are parallel, so no divide.
    #[inline]
    pub fn uses_perspective_divide(self) -> bool {
        !matches!(self, LightKind::Directional)
    }

    /// Point and spot contributions fall off with squared distance.
    #[inline]
    pub fn attenuates_by_distance(self) -> bool {
        !matches!(self, LightKind::Directional)
    }
}

#[derive(Clone, Debug)]
pub struct Light {
    kind: LightKind,
    origin: Vec3,
    orientation: Orientation,
    strength: f32,
    color: Rgba,
    pub enabled: bool,

    view_width: f32,
    view_height: f32,
    z_near: f32,
    z_far: f32,

    // Derived view machinery, camera-style.
    world_to_view: Mat4,
    view_to_screen: Mat4,
    planes: [Plane; 6],

    /// Per-light depth buffer, sized independently of any camera.
    pub(crate) shadow_map: Buffer2D<f32>,
}

/// Default shadow-map resolution.
pub const SHADOW_MAP_SIZE: usize = 256;

impl Light {
    fn new(kind: LightKind, origin: Vec3, color: Rgba, strength: f32) -> Light {
        let mut light = Light {
            kind,
            origin,
            orientation: Orientation::default(),
            strength,
            color,
            enabled: true,
            view_width: if kind == LightKind::Directional { 20.0 } else { 2.0 },
            view_height: if kind == LightKind::Directional { 20.0 } else { 2.0 },
            z_near: 1.0,
            z_far: 100.0,
            world_to_view: Mat4::IDENTITY,
            view_to_screen: Mat4::IDENTITY,
            planes: [Plane::new(vec4(0.0, 0.0, 0.0, 1.0), vec4(0.0, 0.0, 1.0, 0.0)); 6],
            shadow_map: Buffer2D::new(SHADOW_MAP_SIZE, SHADOW_MAP_SIZE, DEPTH_FAR),
        };
        light.recompute();
        light
    }

    /// Parallel light shining along `direction` from `origin`.
    pub fn directional(origin: Vec3, direction: Vec3, color: Rgba) -> Result<Light, MathError> {
        let mut light = Light::new(LightKind::Directional, origin, color, 1.0);
        light.aim(direction)?;
        Ok(light)
    }

    /// Omnidirectional light; the shadow frustum is aimed with [`aim`].
    ///
    /// [`aim`]: Light::aim
    pub fn point(origin: Vec3, strength: f32, color: Rgba) -> Light {
        let mut light = Light::new(LightKind::Point, origin, color, strength);
        // Wide cone so a point light covers most of what it faces.
        light.view_width = 8.0;
        light.view_height = 8.0;
        light.recompute();
        light
    }

    /// Narrow-cone light aimed along `direction`.
    pub fn spot(
        origin: Vec3,
        direction: Vec3,
        strength: f32,
        color: Rgba,
    ) -> Result<Light, MathError> {
        let mut light = Light::new(LightKind::Spot, origin, color, strength);
        light.aim(direction)?;
        Ok(light)
    }

    /*──────────────────────── accessors ───────────────────────*/

    #[inline]
    pub fn kind(&self) -> LightKind {
        self.kind
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    #[inline]
    pub fn world_to_view(&self) -> &Mat4 {
        &self.world_to_view
    }

    #[inline]
    pub fn view_to_screen(&self) -> &Mat4 {
        &self.view_to_screen
    }

    #[inline]
    pub fn frustum_planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    #[inline]
    pub fn shadow_map(&self) -> &Buffer2D<f32> {
        &self.shadow_map
    }

    #[inline]
    pub fn view_volume(&self) -> (f32, f32, f32, f32) {
        (self.view_width, self.view_height, self.z_near, self.z_far)
    }

    /*──────────────────────── mutation ───────────────────────*/

    /// Point the shadow frustum along `direction` (world space).
    pub fn aim(&mut self, direction: Vec3) -> Result<(), MathError> {
        let forward = direction.normalize()?;
        // Any up hint not parallel to the gaze works.
        let up = if forward.cross(crate::math::vec3(0.0, 1.0, 0.0)).length_squared() > 1e-6 {
            crate::math::vec3(0.0, 1.0, 0.0)
        } else {
            crate::math::vec3(0.0, 0.0, 1.0)
        };
        self.orientation.set_forward_up(forward, up)?;
        self.recompute();
        Ok(())
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
        self.recompute();
    }

    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn set_view_volume(&mut self, width: f32, height: f32, z_near: f32, z_far: f32) {
        assert!(width > 0.0 && height > 0.0, "view size must be positive");
        assert!(0.0 < z_near && z_near < z_far, "need 0 < near < far");
        self.view_width = width;
        self.view_height = height;
        self.z_near = z_near;
        self.z_far = z_far;
        self.recompute();
    }

    /// Resize the private shadow map (resets its contents).
    pub fn set_shadow_map_size(&mut self, width: usize, height: usize) {
        assert!(width > 0 && height > 0, "shadow map must be non-empty");
        self.shadow_map = Buffer2D::new(width, height, DEPTH_FAR);
    }

    fn recompute(&mut self) {
        let rot = self.orientation.to_mat4();
        self.world_to_view = rot.transpose() * translation(-self.origin);
        let persp = self.kind.uses_perspective_divide();
        self.view_to_screen = view_to_screen(
            persp,
            self.view_width,
            self.view_height,
            self.z_near,
            self.z_far,
        );
        self.planes = frustum_planes(
            persp,
            self.view_width,
            self.view_height,
            self.z_near,
            self.z_far,
        );
    }
}
