//! Shadow-map generation: the transform/clip/rasterize chain replayed
//! in light space, writing depth only.

use log::debug;

use crate::geometry::{Mesh, MeshFlags};
use crate::render::buffer::{DEPTH_FAR, plot_depth};
use crate::render::pipeline::{ViewContext, each_window_triangle};
use crate::render::raster::walk_triangle;
use crate::scene::Light;

/// Repopulate `light`'s private depth buffer from every shadow-casting
/// mesh. Shadow writes use plain `<` against the sentinel-initialized
/// buffer: no color, no epsilon.
pub(crate) fn render_shadow_map(light: &mut Light, meshes: &[Mesh], bounds_checking: bool) {
    let ctx = ViewContext::from_light(light);
    light.shadow_map.fill(DEPTH_FAR);

    let mut triangles = 0usize;
    for mesh in meshes {
        if !mesh.flags.contains(MeshFlags::CAST_SHADOWS)
            || !mesh.flags.contains(MeshFlags::DRAW_FACES)
        {
            continue;
        }
        each_window_triangle(&ctx, mesh, |wv, _| {
            triangles += 1;
            walk_triangle(wv, |x, y, z, _| {
                plot_depth(&mut light.shadow_map, x, y, z, bounds_checking);
            });
        });
    }
    debug!(
        "shadow map {}x{}: {triangles} triangles rasterized",
        ctx.width, ctx.height
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FaceStyle;
    use crate::geometry::primitives::quad;
    use crate::math::vec3;
    use crate::render::color::WHITE;
    use crate::scene::Light;

    #[test]
    fn occluder_populates_the_map() {
        // Directional light at +Z shining toward -Z onto a flat quad.
        let mut light =
            Light::directional(vec3(0.0, 0.0, 10.0), vec3(0.0, 0.0, -1.0), WHITE).unwrap();
        light.set_shadow_map_size(32, 32);
        let mut wall = quad(4.0, 4.0, FaceStyle::solid(WHITE));
        wall.flags |= MeshFlags::CAST_SHADOWS;

        render_shadow_map(&mut light, &[wall], true);

        // Center of the map sees the quad at depth < sentinel.
        let center = light.shadow_map().get(16, 16);
        assert!(center < DEPTH_FAR);
        // A corner far outside the quad keeps the sentinel.
        assert_eq!(light.shadow_map().get(0, 0), DEPTH_FAR);
    }

    #[test]
    fn non_casting_meshes_are_skipped() {
        let mut light =
            Light::directional(vec3(0.0, 0.0, 10.0), vec3(0.0, 0.0, -1.0), WHITE).unwrap();
        light.set_shadow_map_size(16, 16);
        let mut wall = quad(4.0, 4.0, FaceStyle::solid(WHITE));
        wall.flags.remove(MeshFlags::CAST_SHADOWS);

        render_shadow_map(&mut light, &[wall], true);
        assert_eq!(light.shadow_map().get(8, 8), DEPTH_FAR);
    }
}
