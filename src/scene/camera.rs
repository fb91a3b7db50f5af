//! Camera: placement, view volume, derived matrices and frustum planes.
//!
//! View space puts the camera at the origin with `right` on +X, `up` on
//! +Y and the gaze down **-Z**; NDC depth spans [-1, 1] between the
//! near and far planes. Every mutation recomputes the cached matrices
//! and planes synchronously and bumps the revision counter the dirty
//! check reads.

use crate::math::{
    Mat4, MathError, Orientation, Plane, Vec3, rotation, translation, vec4,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraKind {
    Orthogonal,
    Perspective,
    /// Two perspective eyes composited side by side.
    Stereo { eye_separation: f32 },
}

impl CameraKind {
    /// Whether projection divides by `w`.
    #[inline]
    pub fn uses_perspective_divide(self) -> bool {
        !matches!(self, CameraKind::Orthogonal)
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    kind: CameraKind,
    origin: Vec3,
    orientation: Orientation,
    view_width: f32,
    view_height: f32,
    z_near: f32,
    z_far: f32,
    revision: u64,

    // Derived, recomputed on every mutation.
    world_to_view: Mat4,
    view_to_world: Mat4,
    view_to_screen: Mat4,
    planes: [Plane; 6],
}

impl Camera {
    /// Camera at the world origin looking down -Z; view plane 2x2,
    /// depth range 1..100.
    pub fn new(kind: CameraKind) -> Camera {
        let mut cam = Camera {
            kind,
            origin: Vec3::ZERO,
            orientation: Orientation::default(),
            view_width: 2.0,
            view_height: 2.0,
            z_near: 1.0,
            z_far: 100.0,
            revision: 0,
            world_to_view: Mat4::IDENTITY,
            view_to_world: Mat4::IDENTITY,
            view_to_screen: Mat4::IDENTITY,
            planes: [Plane::new(vec4(0.0, 0.0, 0.0, 1.0), vec4(0.0, 0.0, 1.0, 0.0)); 6],
        };
        cam.recompute();
        cam
    }

    /*──────────────────────── accessors ───────────────────────*/

    #[inline]
    pub fn kind(&self) -> CameraKind {
        self.kind
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    #[inline]
    pub fn view_size(&self) -> (f32, f32) {
        (self.view_width, self.view_height)
    }

    #[inline]
    pub fn z_range(&self) -> (f32, f32) {
        (self.z_near, self.z_far)
    }

    /// Monotonic change counter; `Scene` compares it against the value
    /// captured at the last successful render.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn world_to_view(&self) -> &Mat4 {
        &self.world_to_view
    }

    #[inline]
    pub fn view_to_world(&self) -> &Mat4 {
        &self.view_to_world
    }

    #[inline]
    pub fn view_to_screen(&self) -> &Mat4 {
        &self.view_to_screen
    }

    #[inline]
    pub fn frustum_planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /*──────────────────────── mutation ───────────────────────*/

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
        self.recompute();
    }

    /// View-plane dimensions; must be positive.
    pub fn set_view_size(&mut self, width: f32, height: f32) {
        assert!(width > 0.0 && height > 0.0, "view size must be positive");
        self.view_width = width;
        self.view_height = height;
        self.recompute();
    }

    /// Near/far depth range; `0 < near < far`.
    pub fn set_z_range(&mut self, z_near: f32, z_far: f32) {
        assert!(0.0 < z_near && z_near < z_far, "need 0 < near < far");
        self.z_near = z_near;
        self.z_far = z_far;
        self.recompute();
    }

    /// Aim at `target` keeping `up` as the up hint.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) -> Result<(), MathError> {
        let forward = (target - self.origin).normalize()?;
        self.orientation.set_forward_up(forward, up)?;
        self.recompute();
        Ok(())
    }

    pub fn translate(&mut self, v: Vec3) {
        self.origin = self.origin + v;
        self.recompute();
    }

    /// Turn around `up`; positive pans left.
    pub fn pan(&mut self, angle: f32) -> Result<(), MathError> {
        self.rotate_basis(self.orientation.up(), angle)
    }

    /// Rotate around `right`; positive looks down (clockwise about the
    /// right axis).
    pub fn tilt(&mut self, angle: f32) -> Result<(), MathError> {
        self.rotate_basis(self.orientation.right(), -angle)
    }

    /// Rotate around `forward`; positive rolls clockwise for the viewer.
    pub fn roll(&mut self, angle: f32) -> Result<(), MathError> {
        self.rotate_basis(self.orientation.forward(), angle)
    }

    fn rotate_basis(&mut self, axis: Vec3, angle: f32) -> Result<(), MathError> {
        let rot = rotation(axis, angle)?;
        self.orientation = self.orientation.rotated(&rot)?;
        self.recompute();
        Ok(())
    }

    /// The two derived per-eye cameras of a stereo rig.
    pub fn eye_cameras(&self) -> Option<(Camera, Camera)> {
        let CameraKind::Stereo { eye_separation } = self.kind else {
            return None;
        };
        let offset = self.orientation.right() * (eye_separation * 0.5);
        let mut left = self.clone();
        left.kind = CameraKind::Perspective;
        left.origin = self.origin - offset;
        left.recompute();
        let mut right = left.clone();
        right.origin = self.origin + offset;
        right.recompute();
        Some((left, right))
    }

    /*──────────────────────── derived state ───────────────────────*/

    fn recompute(&mut self) {
        let rot = self.orientation.to_mat4();
        self.view_to_world = translation(self.origin) * rot;
        // Rigid inverse: transpose the rotation, negate the translation.
        self.world_to_view = rot.transpose() * translation(-self.origin);
        self.view_to_screen = view_to_screen(
            self.kind.uses_perspective_divide(),
            self.view_width,
            self.view_height,
            self.z_near,
            self.z_far,
        );
        self.planes = frustum_planes(
            self.kind.uses_perspective_divide(),
            self.view_width,
            self.view_height,
            self.z_near,
            self.z_far,
        );
        self.revision += 1;
    }
}

/// Projection matrix for a view volume. Perspective maps depth
/// non-linearly and leaves the divide to the caller (`w = depth`);
/// orthogonal keeps `w = 1`.
pub(crate) fn view_to_screen(perspective: bool, vw: f32, vh: f32, n: f32, f: f32) -> Mat4 {
    if perspective {
        Mat4::from_rows([
            [2.0 * n / vw, 0.0, 0.0, 0.0],
            [0.0, 2.0 * n / vh, 0.0, 0.0],
            [0.0, 0.0, -(f + n) / (f - n), -2.0 * f * n / (f - n)],
            [0.0, 0.0, -1.0, 0.0],
        ])
    } else {
        Mat4::from_rows([
            [2.0 / vw, 0.0, 0.0, 0.0],
            [0.0, 2.0 / vh, 0.0, 0.0],
            [0.0, 0.0, -2.0 / (f - n), -(f + n) / (f - n)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

/// The six view-space half-spaces enclosing the visible volume,
/// outward normals pointing inward per the `>= 0` inside convention.
pub(crate) fn frustum_planes(perspective: bool, vw: f32, vh: f32, n: f32, f: f32) -> [Plane; 6] {
    let origin = vec4(0.0, 0.0, 0.0, 1.0);
    let near = Plane::new(vec4(0.0, 0.0, -n, 1.0), vec4(0.0, 0.0, -1.0, 0.0));
    let far = Plane::new(vec4(0.0, 0.0, -f, 1.0), vec4(0.0, 0.0, 1.0, 0.0));
    if perspective {
        // Side planes pass through the eye; slope follows the view
        // plane's extent at the near distance.
        let (kx, ky) = (vw / (2.0 * n), vh / (2.0 * n));
        [
            Plane::new(origin, vec4(1.0, 0.0, -kx, 0.0)),
            Plane::new(origin, vec4(-1.0, 0.0, -kx, 0.0)),
            Plane::new(origin, vec4(0.0, 1.0, -ky, 0.0)),
            Plane::new(origin, vec4(0.0, -1.0, -ky, 0.0)),
            near,
            far,
        ]
    } else {
        let (hw, hh) = (vw * 0.5, vh * 0.5);
        [
            Plane::new(vec4(-hw, 0.0, 0.0, 1.0), vec4(1.0, 0.0, 0.0, 0.0)),
            Plane::new(vec4(hw, 0.0, 0.0, 1.0), vec4(-1.0, 0.0, 0.0, 0.0)),
            Plane::new(vec4(0.0, -hh, 0.0, 1.0), vec4(0.0, 1.0, 0.0, 0.0)),
            Plane::new(vec4(0.0, hh, 0.0, 1.0), vec4(0.0, -1.0, 0.0, 0.0)),
            near,
            far,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn world_to_view_is_inverse_of_placement() {
        let mut cam = Camera::new(CameraKind::Perspective);
        cam.set_origin(vec3(3.0, 2.0, 8.0));
        cam.pan(0.7).unwrap();
        cam.tilt(-0.3).unwrap();
        let round = *cam.world_to_view() * *cam.view_to_world();
        assert!(round.approx_eq(&Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn perspective_depth_maps_near_far_to_ndc() {
        let cam = {
            let mut c = Camera::new(CameraKind::Perspective);
            c.set_z_range(1.0, 100.0);
            c
        };
        let near = *cam.view_to_screen() * vec4(0.0, 0.0, -1.0, 1.0);
        let far = *cam.view_to_screen() * vec4(0.0, 0.0, -100.0, 1.0);
        assert!((near.z / near.w - -1.0).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
        assert!((near.w - 1.0).abs() < 1e-6);
        assert!((far.w - 100.0).abs() < 1e-4);
    }

    #[test]
    fn orthogonal_projection_keeps_w_one() {
        let cam = Camera::new(CameraKind::Orthogonal);
        let p = *cam.view_to_screen() * vec4(0.7, -0.3, -50.0, 1.0);
        assert_eq!(p.w, 1.0);
        assert!((p.x - 0.7).abs() < 1e-6);
    }

    #[test]
    fn frustum_contains_axis_point() {
        let cam = Camera::new(CameraKind::Perspective);
        let p = vec4(0.0, 0.0, -10.0, 1.0);
        for plane in cam.frustum_planes() {
            assert!(plane.signed_distance(p) >= 0.0);
        }
        // Behind the eye: rejected by the near plane.
        let behind = vec4(0.0, 0.0, 0.5, 1.0);
        assert!(
            cam.frustum_planes()
                .iter()
                .any(|pl| pl.signed_distance(behind) < 0.0)
        );
    }

    #[test]
    fn pan_turns_left_tilt_looks_down() {
        let mut cam = Camera::new(CameraKind::Perspective);
        cam.pan(FRAC_PI_2).unwrap();
        assert!(cam.orientation().forward().approx_eq(vec3(-1.0, 0.0, 0.0), 1e-5));

        let mut cam = Camera::new(CameraKind::Perspective);
        cam.tilt(FRAC_PI_2).unwrap();
        assert!(cam.orientation().forward().approx_eq(vec3(0.0, -1.0, 0.0), 1e-5));
    }

    #[test]
    fn mutation_bumps_revision() {
        let mut cam = Camera::new(CameraKind::Orthogonal);
        let r0 = cam.revision();
        cam.translate(vec3(0.0, 0.0, 1.0));
        assert!(cam.revision() > r0);
    }

    #[test]
    fn stereo_eyes_straddle_the_rig() {
        let mut cam = Camera::new(CameraKind::Stereo {
            eye_separation: 0.5,
        });
        cam.set_origin(vec3(0.0, 0.0, 5.0));
        let (l, r) = cam.eye_cameras().unwrap();
        assert!(l.origin().approx_eq(vec3(-0.25, 0.0, 5.0), 1e-6));
        assert!(r.origin().approx_eq(vec3(0.25, 0.0, 5.0), 1e-6));
        assert!(Camera::new(CameraKind::Perspective).eye_cameras().is_none());
    }
}
