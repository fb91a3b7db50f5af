//! Lighting resolution: re-project every lit pixel into every light's
//! screen space and test it against that light's shadow map.

use crate::math::{Vec4, vec4};
use crate::render::buffer::{DEPTH_EPS, DEPTH_FAR, RenderTarget};
use crate::render::color::{BLACK, darken, mix};
use crate::render::pipeline::ViewContext;
use crate::scene::Light;

use super::RenderError;

/// Post pass over every pixel with valid depth: reconstruct its
/// world-space position, collect the lights that can see it, and mix
/// their colors into the stored color, or force black when no light
/// contributes (there is no ambient term).
///
/// Mixing is a cumulative 50/50 per-channel average applied in light
/// order. The result is order-dependent and not energy-conserving;
/// golden images depend on it, so any change here is a breaking one.
pub(crate) fn resolve_lighting(
    ctx: &ViewContext,
    lights: &[Light],
    target: &mut RenderTarget,
) -> Result<(), RenderError> {
    // Orthogonal views unproject with one inverse matrix; perspective
    // views must undo the non-linear depth mapping first.
    let window_to_world = if ctx.perspective {
        None
    } else {
        Some(
            (ctx.screen_to_window() * ctx.view_to_screen * ctx.world_to_view)
                .inverse()?,
        )
    };

    for x in 0..ctx.width {
        for y in 0..ctx.height {
            let z = target.depth.get(x, y);
            if z >= DEPTH_FAR {
                continue;
            }
            let world = match &window_to_world {
                Some(m) => *m * vec4(x as f32, y as f32, z, 1.0),
                None => unproject_perspective(ctx, x, y, z),
            };

            let mut color = target.color.get(x, y);
            let mut any_light = false;
            for light in lights.iter().filter(|l| l.enabled) {
                if let Some(lit) = light_contribution(light, world) {
                    color = mix(color, lit);
                    any_light = true;
                }
            }
            target.color.set(x, y, if any_light { color } else { BLACK });
        }
    }
    Ok(())
}

/// Undo window mapping and the perspective depth curve, then return to
/// world space through the camera placement.
fn unproject_perspective(ctx: &ViewContext, x: usize, y: usize, z_ndc: f32) -> Vec4 {
    let sx = 0.5 * (ctx.width.max(1) - 1) as f32;
    let sy = 0.5 * (ctx.height.max(1) - 1) as f32;
    let x_ndc = x as f32 / sx - 1.0;
    let y_ndc = y as f32 / sy - 1.0;
    let (n, f) = (ctx.z_near, ctx.z_far);
    let depth = 2.0 * n * f / (n + f - z_ndc * (f - n));
    let view = vec4(
        x_ndc * depth * ctx.view_width / (2.0 * n),
        y_ndc * depth * ctx.view_height / (2.0 * n),
        -depth,
        1.0,
    );
    ctx.view_to_world * view
}

/// The color `light` contributes at `world`, or `None` when the point
/// is outside the light's map or occluded.
fn light_contribution(light: &Light, world: Vec4) -> Option<u32> {
    let view = *light.world_to_view() * world;
    let mut screen = *light.view_to_screen() * view;
    if light.kind().uses_perspective_divide() {
        if screen.w <= 0.0 {
            // Behind the light.
            return None;
        }
        screen = screen.perspective_divide();
    }

    let map = light.shadow_map();
    let sx = 0.5 * (map.width().max(1) - 1) as f32;
    let sy = 0.5 * (map.height().max(1) - 1) as f32;
    let px = ((screen.x + 1.0) * sx).round() as i32;
    let py = ((screen.y + 1.0) * sy).round() as i32;
    if !map.in_bounds(px, py) {
        return None;
    }

    // At or in front of the recorded depth: not occluded.
    let stored = map.get(px as usize, py as usize);
    if screen.z > stored + DEPTH_EPS {
        return None;
    }

    let mut color = light.color();
    if light.kind().attenuates_by_distance() {
        let d2 = (world.xyz() - light.origin()).length_squared();
        if d2 > 0.0 {
            color = darken(color, light.strength() / d2);
        }
    }
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;
    use crate::render::color::{WHITE, rgb};
    use crate::scene::Light;

    #[test]
    fn unshadowed_point_is_lit() {
        let light =
            Light::directional(vec3(0.0, 0.0, 10.0), vec3(0.0, 0.0, -1.0), WHITE).unwrap();
        // Empty shadow map: nothing occludes anything.
        assert!(light_contribution(&light, vec4(0.0, 0.0, 0.0, 1.0)).is_some());
    }

    #[test]
    fn point_outside_light_frustum_gets_nothing() {
        let light =
            Light::directional(vec3(0.0, 0.0, 10.0), vec3(0.0, 0.0, -1.0), WHITE).unwrap();
        // Far off to the side: projects outside the shadow map.
        assert!(light_contribution(&light, vec4(500.0, 0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn point_light_attenuates_with_distance() {
        let mut light = Light::point(vec3(0.0, 0.0, 0.0), 4.0, WHITE);
        light.aim(vec3(0.0, 0.0, -1.0)).unwrap();
        // Distance 2 along the light axis: strength / d^2 = 1.0.
        let near = light_contribution(&light, vec4(0.0, 0.0, -2.0, 1.0)).unwrap();
        assert_eq!(near, WHITE);
        // Distance 4: factor 0.25.
        let far = light_contribution(&light, vec4(0.0, 0.0, -4.0, 1.0)).unwrap();
        assert_eq!(far, rgb(63, 63, 63));
    }

    #[test]
    fn behind_a_perspective_light_is_dark() {
        let mut light = Light::point(vec3(0.0, 0.0, 0.0), 1.0, WHITE);
        light.aim(vec3(0.0, 0.0, -1.0)).unwrap();
        assert!(light_contribution(&light, vec4(0.0, 0.0, 5.0, 1.0)).is_none());
    }
}
