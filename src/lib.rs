//! # yarast_rs - Yet Another software RASTerizer
//!
//! A CPU scanline renderer: meshes go model space → world → view →
//! clip → screen → window through homogeneous 4x4 transforms, triangles
//! are clipped against the view frustum (splitting as needed), scanline
//! rasterized into a z-buffer, lit against per-light shadow maps, and
//! packed into a 24-bit BGR frame.
//!
//! ```no_run
//! use yarast_rs::geometry::{FaceStyle, primitives::cube};
//! use yarast_rs::math::vec3;
//! use yarast_rs::render::{PixelFormat, color};
//! use yarast_rs::scene::{Camera, CameraKind, Light, Scene};
//!
//! let mut camera = Camera::new(CameraKind::Perspective);
//! camera.set_origin(vec3(0.0, 2.0, 8.0));
//! camera.look_at(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)).unwrap();
//!
//! let mut scene = Scene::new(camera);
//! scene.add_mesh(cube(2.0, FaceStyle::solid(color::RED), color::WHITE));
//! scene.add_light(
//!     Light::directional(vec3(5.0, 10.0, 5.0), vec3(-0.5, -1.0, -0.5), color::WHITE).unwrap(),
//! );
//!
//! let frame = scene.render(640, 480, PixelFormat::Bgr24).unwrap().unwrap();
//! assert_eq!(frame.data.len(), 640 * 480 * 3);
//! ```

pub mod geometry;
pub mod math;
pub mod render;
pub mod scene;

pub use render::{Frame, PixelFormat, RenderError};
pub use scene::{Camera, CameraKind, Light, LightKind, Scene};
