//! Shape mask geometry for the masked fade grid.
//!
//! The mask is the region right of a quadratic curve running from a
//! width-dependent apex on the top edge to the bottom-right corner, closed
//! along the right edge.

use kurbo::{BezPath, ParamCurve, Point, QuadBez};
use tessera_core::{DrawingContext, MASK_MAX_WIDTH, MASK_MIN_WIDTH};

/// Fewest curve samples used by [`ShapeMask::distance_to_boundary`].
const MIN_SAMPLE_POINTS: f64 = 50.0;
/// Most curve samples used by [`ShapeMask::distance_to_boundary`].
const MAX_SAMPLE_POINTS: f64 = 500.0;

/// Horizontal position of the curve's top endpoint for a canvas `width`.
///
/// 0 up to [`MASK_MIN_WIDTH`], a third of the width from [`MASK_MAX_WIDTH`] on,
/// linearly interpolated in between.
pub fn compute_start_x(width: f64) -> f64 {
    if width <= MASK_MIN_WIDTH {
        return 0.0;
    }
    if width >= MASK_MAX_WIDTH {
        return width / 3.0;
    }
    let ratio = (width - MASK_MIN_WIDTH) / (MASK_MAX_WIDTH - MASK_MIN_WIDTH);
    ratio * (width / 3.0)
}

/// Mask boundary for a canvas of fixed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeMask {
    width: f64,
    height: f64,
}

impl ShapeMask {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Top endpoint of the curve.
    pub fn start(&self) -> Point {
        Point::new(compute_start_x(self.width), 0.0)
    }

    pub fn control(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.75)
    }

    /// Bottom endpoint of the curve, the far bottom-right corner.
    pub fn end(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// Replay the boundary as the context's current path.
    pub fn trace<C: DrawingContext>(&self, ctx: &mut C) {
        let (start, control, end) = (self.start(), self.control(), self.end());
        ctx.begin_path();
        ctx.move_to(start.x, start.y);
        ctx.quadratic_curve_to(control.x, control.y, end.x, end.y);
        ctx.line_to(self.width, 0.0);
        ctx.close_path();
    }

    /// The boundary curve from the top endpoint to the bottom-right corner.
    pub fn curve(&self) -> QuadBez {
        QuadBez::new(self.start(), self.control(), self.end())
    }

    /// The closed mask region as a standalone path.
    pub fn boundary(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.quad_to(self.control(), self.end());
        path.line_to((self.width, 0.0));
        path.close_path();
        path
    }

    /// Hit-test point for a tile at `(x_pos, y_pos)`: its left edge, half a tile down.
    pub fn tile_anchor(x_pos: f64, y_pos: f64, size: f64) -> Point {
        Point::new(x_pos, y_pos + size / 2.0)
    }

    /// Curve sample density, scaled with the surface and clamped to `[50, 500]`.
    pub fn sample_points(&self) -> f64 {
        (self.width.max(self.height) / 10.0).clamp(MIN_SAMPLE_POINTS, MAX_SAMPLE_POINTS)
    }

    /// Approximate distance from `point` to the curve, by sampling it.
    pub fn distance_to_boundary(&self, point: Point) -> f64 {
        let curve = self.curve();
        let samples = self.sample_points();

        (0..=samples.floor() as usize)
            .map(|i| curve.eval(i as f64 / samples))
            .map(|sample| point.distance(sample))
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    #[test]
    fn test_start_x_anchors() {
        assert_eq!(compute_start_x(0.0), 0.0);
        assert_eq!(compute_start_x(320.0), 0.0);
        assert_eq!(compute_start_x(1440.0), 480.0);
        assert_eq!(compute_start_x(3000.0), 1000.0);
    }

    #[test]
    fn test_start_x_interpolates() {
        let expected = (320.0 / 1120.0) * (640.0 / 3.0);
        assert!((compute_start_x(640.0) - expected).abs() < 1e-9);
        assert!((compute_start_x(640.0) - 60.95).abs() < 0.01);
    }

    #[test]
    fn test_start_x_monotonic_and_continuous() {
        let mut last = compute_start_x(300.0);
        let mut width = 300.0;
        while width <= 1500.0 {
            let x = compute_start_x(width);
            assert!(x >= last);
            assert!(x - last < 2.0);
            last = x;
            width += 1.0;
        }
    }

    #[test]
    fn test_sample_points_clamped() {
        assert_eq!(ShapeMask::new(100.0, 100.0).sample_points(), 50.0);
        assert_eq!(ShapeMask::new(640.0, 480.0).sample_points(), 64.0);
        assert_eq!(ShapeMask::new(8000.0, 100.0).sample_points(), 500.0);
    }

    #[test]
    fn test_boundary_contains() {
        let boundary = ShapeMask::new(640.0, 480.0).boundary();
        // Top-right corner region is inside, bottom-left is outside.
        assert!(boundary.contains(Point::new(620.0, 20.0)));
        assert!(!boundary.contains(Point::new(20.0, 460.0)));
        assert!(!boundary.contains(Point::new(20.0, 20.0)));
    }

    #[test]
    fn test_curve_endpoints() {
        let mask = ShapeMask::new(640.0, 480.0);
        let curve = mask.curve();
        assert_eq!(curve.eval(0.0), mask.start());
        assert_eq!(curve.eval(1.0), mask.end());
        // Point between the two halves of the curve sits inside the region.
        assert!(mask.boundary().contains(Point::new(600.0, 300.0)));
    }

    #[test]
    fn test_distance_on_curve_is_zero() {
        let mask = ShapeMask::new(640.0, 480.0);
        assert!(mask.distance_to_boundary(mask.start()) < 1e-9);
        assert!(mask.distance_to_boundary(mask.end()) < 1e-9);
    }

    #[test]
    fn test_distance_grows_away_from_curve() {
        let mask = ShapeMask::new(640.0, 480.0);
        let near = mask.distance_to_boundary(Point::new(400.0, 150.0));
        let far = mask.distance_to_boundary(Point::new(630.0, 10.0));
        assert!(far > near);
    }

    #[test]
    fn test_trace_matches_boundary() {
        let mask = ShapeMask::new(640.0, 480.0);
        let boundary = mask.boundary();
        let mut surface = crate::TerminalSurface::with_pixel_size(640.0, 480.0);
        mask.trace(&mut surface);
        for (x, y) in [(620.0, 20.0), (20.0, 460.0), (300.0, 100.0), (500.0, 400.0)] {
            assert_eq!(
                surface.is_point_in_path(x, y),
                boundary.contains(Point::new(x, y))
            );
        }
    }
}
