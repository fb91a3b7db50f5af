//! Depth / color buffers and the per-pixel compare-and-write rule.

use super::color::Rgba;

/// Depth sentinel: NDC depth lives in [-1, 1], so 2.0 compares as
/// "farther than any valid depth".
pub const DEPTH_FAR: f32 = 2.0;

/// Tolerance of the color-pass depth test ("approximately less than").
pub const DEPTH_EPS: f32 = 1e-4;

/// Dense first-dimension-major 2D array: `idx = x * height + y`.
#[derive(Clone, Debug)]
pub struct Buffer2D<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Buffer2D<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Buffer2D<T> {
        Buffer2D {
            width,
            height,
            data: vec![fill; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every cell (depth to the far sentinel, color to background).
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[x * self.height + y]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[x * self.height + y] = value;
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

/// Paired depth + color buffer for one rendered view.
///
/// `bounds_checking` controls the fail-fast contract of `plot`: enabled,
/// an out-of-range pixel panics with the offending coordinates; disabled,
/// the explicit check is elided and the caller's clipping is trusted
/// (slice indexing still guards memory). Runtime flag so both behaviors
/// are testable in one binary.
pub struct RenderTarget {
    pub depth: Buffer2D<f32>,
    pub color: Buffer2D<Rgba>,
    pub bounds_checking: bool,
}

impl RenderTarget {
    pub fn new(width: usize, height: usize, background: Rgba, bounds_checking: bool) -> Self {
        RenderTarget {
            depth: Buffer2D::new(width, height, DEPTH_FAR),
            color: Buffer2D::new(width, height, background),
            bounds_checking,
        }
    }

    pub fn clear(&mut self, background: Rgba) {
        self.depth.fill(DEPTH_FAR);
        self.color.fill(background);
    }

    /// Depth-test-and-write: passes when `z < stored + DEPTH_EPS`, then
    /// overwrites both depth and color; fails as a no-op.
    #[inline]
    pub fn plot(&mut self, x: i32, y: i32, z: f32, color: Rgba) {
        if self.bounds_checking && !self.depth.in_bounds(x, y) {
            panic!(
                "pixel ({x}, {y}, z={z}) outside {}x{} render target",
                self.depth.width(),
                self.depth.height()
            );
        }
        let (x, y) = (x as usize, y as usize);
        if z < self.depth.get(x, y) + DEPTH_EPS {
            self.depth.set(x, y, z);
            self.color.set(x, y, color);
        }
    }
}

/// Depth-only plot for shadow maps: plain `<`, no epsilon, no color.
#[inline]
pub fn plot_depth(map: &mut Buffer2D<f32>, x: i32, y: i32, z: f32, bounds_checking: bool) {
    if bounds_checking && !map.in_bounds(x, y) {
        panic!(
            "pixel ({x}, {y}, z={z}) outside {}x{} shadow map",
            map.width(),
            map.height()
        );
    }
    let (x, y) = (x as usize, y as usize);
    if z < map.get(x, y) {
        map.set(x, y, z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::{RED, WHITE, rgb};

    #[test]
    fn depth_test_idempotent() {
        let mut t = RenderTarget::new(4, 4, WHITE, true);
        t.plot(1, 2, 0.5, RED);
        let (d, c) = (t.depth.get(1, 2), t.color.get(1, 2));
        t.plot(1, 2, 0.5, RED);
        assert_eq!((t.depth.get(1, 2), t.color.get(1, 2)), (d, c));
    }

    #[test]
    fn farther_write_never_overwrites() {
        let mut t = RenderTarget::new(4, 4, WHITE, true);
        t.plot(0, 0, -0.5, RED);
        t.plot(0, 0, 0.5, rgb(0, 255, 0));
        assert_eq!(t.color.get(0, 0), RED);
        assert_eq!(t.depth.get(0, 0), -0.5);
    }

    #[test]
    fn nearer_write_overwrites() {
        let mut t = RenderTarget::new(4, 4, WHITE, true);
        t.plot(0, 0, 0.5, RED);
        t.plot(0, 0, -0.5, rgb(0, 255, 0));
        assert_eq!(t.color.get(0, 0), rgb(0, 255, 0));
    }

    #[test]
    #[should_panic(expected = "outside 2x2 render target")]
    fn out_of_range_fails_fast_when_checked() {
        let mut t = RenderTarget::new(2, 2, WHITE, true);
        t.plot(5, 0, 0.0, RED);
    }

    #[test]
    fn shadow_plot_uses_strict_less() {
        let mut map = Buffer2D::new(2, 2, DEPTH_FAR);
        plot_depth(&mut map, 0, 0, 0.5, true);
        assert_eq!(map.get(0, 0), 0.5);
        // Equal depth does not rewrite (strict <).
        plot_depth(&mut map, 0, 0, 0.5, true);
        assert_eq!(map.get(0, 0), 0.5);
        plot_depth(&mut map, 0, 0, 0.9, true);
        assert_eq!(map.get(0, 0), 0.5);
        plot_depth(&mut map, 0, 0, 0.1, true);
        assert_eq!(map.get(0, 0), 0.1);
    }
}
