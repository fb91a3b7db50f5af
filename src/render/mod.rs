//! The render entry point and its sub-passes.
//!
//! Per call: for each enabled light, replay the transform/clip/raster
//! chain in light space to refresh its shadow map; run the camera pass
//! (faces into depth+color, lighting resolved in a post pass over the
//! depth buffer, then edges and outlines); pack the color buffer into a
//! top-down BGR24 frame.

pub mod bitmap;
pub mod buffer;
pub mod clip;
pub mod color;
pub(crate) mod lighting;
pub(crate) mod pipeline;
pub mod raster;
pub(crate) mod shadow;
pub mod texture;

pub use bitmap::Frame;

use log::debug;
use thiserror::Error;

use crate::math::MathError;
use crate::scene::{CameraKind, Scene};
use buffer::RenderTarget;
use pipeline::ViewContext;

/// Output pixel formats. Only `Bgr24` is renderable; the rest are the
/// sentinel non-renderable formats callers must be rejected on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Bgr24,
    DontCare,
    Extended,
    Max,
    Undefined,
}

impl PixelFormat {
    #[inline]
    pub fn is_renderable(self) -> bool {
        matches!(self, PixelFormat::Bgr24)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("pixel format {0:?} is not renderable")]
    UnsupportedPixelFormat(PixelFormat),

    #[error("view transform is not invertible: {0}")]
    DegenerateCamera(#[from] MathError),
}

impl Scene {
    /// Render to a packed frame.
    ///
    /// Zero-area targets yield `Ok(None)`; sentinel pixel formats are
    /// argument errors. Under the render-on-change policy an unchanged
    /// scene returns the cached frame instead of recomputing.
    pub fn render(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Option<Frame>, RenderError> {
        if !format.is_renderable() {
            return Err(RenderError::UnsupportedPixelFormat(format));
        }
        if width == 0 || height == 0 {
            return Ok(None);
        }

        if self.config.render_on_change_only && !self.is_dirty() {
            if let Some(frame) = &self.cached_frame {
                if frame.width == width && frame.height == height {
                    debug!("render: unchanged scene, returning cached frame");
                    return Ok(Some(frame.clone()));
                }
            }
        }

        let revision = self.effective_revision();
        let target = self.render_into(width, height)?;
        let frame = bitmap::pack_frame(&target.color, self.config.pack_workers);
        self.cached_frame = Some(frame.clone());
        self.rendered_revision = Some(revision);
        Ok(Some(frame))
    }

    /// Run the full pipeline and hand back the raw depth/color target.
    pub fn render_into(&mut self, width: u32, height: u32) -> Result<RenderTarget, RenderError> {
        let (width, height) = (width as usize, height as usize);
        let bounds_checking = self.config.bounds_checking;

        for light in &mut self.lights {
            if light.enabled {
                shadow::render_shadow_map(light, &self.meshes, bounds_checking);
            }
        }

        let mut target = RenderTarget::new(width, height, self.background, bounds_checking);

        match self.camera.kind() {
            CameraKind::Stereo { .. } => {
                let (left, right) = self
                    .camera
                    .eye_cameras()
                    .expect("stereo camera yields eye pair");
                let half = width / 2;
                let left_target = self.render_view_with(&left, half, height)?;
                let right_target = self.render_view_with(&right, width - half, height)?;
                blit(&left_target, &mut target, 0);
                blit(&right_target, &mut target, half);
            }
            _ => {
                let ctx = ViewContext::from_camera(&self.camera, width, height);
                self.run_camera_pass(&ctx, &mut target)?;
            }
        }

        Ok(target)
    }

    fn render_view_with(
        &self,
        camera: &crate::scene::Camera,
        width: usize,
        height: usize,
    ) -> Result<RenderTarget, RenderError> {
        let mut target =
            RenderTarget::new(width, height, self.background, self.config.bounds_checking);
        let ctx = ViewContext::from_camera(camera, width, height);
        self.run_camera_pass(&ctx, &mut target)?;
        Ok(target)
    }

    fn run_camera_pass(
        &self,
        ctx: &ViewContext,
        target: &mut RenderTarget,
    ) -> Result<(), RenderError> {
        pipeline::draw_faces(ctx, &self.meshes, &self.textures, target);
        lighting::resolve_lighting(ctx, &self.lights, target)?;
        pipeline::draw_edges(ctx, &self.meshes, target);
        pipeline::draw_outlines(ctx, &self.meshes, target);
        Ok(())
    }
}

/// Copy a sub-render into the final target at column offset `x0`.
fn blit(src: &RenderTarget, dst: &mut RenderTarget, x0: usize) {
    for x in 0..src.color.width() {
        for y in 0..src.color.height() {
            dst.color.set(x0 + x, y, src.color.get(x, y));
            dst.depth.set(x0 + x, y, src.depth.get(x, y));
        }
    }
}
