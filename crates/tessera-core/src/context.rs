//! The drawing surface abstraction consumed by the animation engine.

use crate::color::FillStyle;

/// A 2D drawing context over a surface of known pixel size.
///
/// Mirrors the subset of an HTML canvas context the grid behaviors need:
/// path construction with point-in-path testing, rectangle fill and clear,
/// and a fill style.
pub trait DrawingContext {
    /// Surface width in pixels.
    fn width(&self) -> f64;

    /// Surface height in pixels.
    fn height(&self) -> f64;

    /// Discard the current path.
    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    fn close_path(&mut self);

    /// Whether `(x, y)` lies inside the current path (non-zero winding).
    fn is_point_in_path(&self, x: f64, y: f64) -> bool;

    fn set_fill_style(&mut self, style: FillStyle);

    /// Composite the current fill style over the rectangle.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Reset the rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}
