//! Shape-masked fade grid.
//!
//! Only tiles inside the [`ShapeMask`] are kept. Each kept tile gets a
//! distance percentage: the farthest tiles fade in once on their own, the
//! rest shimmer at random, more often the closer they sit to the boundary.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tessera_core::{DrawingContext, FIRST_ANIMATION_THRESHOLD, Point, TRIGGER_RATE};
use tracing::debug;

use crate::hover::{mask_opacity, pointer_distance};
use crate::mask::ShapeMask;
use crate::scheduler::{CanvasState, Strategy};
use crate::square::{FadeCurve, Square};

/// The masked fade behavior.
#[derive(Debug)]
pub struct MaskedFade {
    squares: Vec<Square>,
    rng: StdRng,
}

impl Default for MaskedFade {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskedFade {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic trigger sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            squares: Vec::new(),
            rng,
        }
    }

    /// Cells kept by the last grid build.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Keep the tiles inside the mask and rank them by boundary distance.
    pub fn set_squares<C: DrawingContext>(&mut self, ctx: &mut C, state: &CanvasState) {
        let (width, height) = (ctx.width(), ctx.height());
        let size = state.tile_size.pixels();
        let mask = ShapeMask::new(width, height);
        mask.trace(ctx);

        let rows = (height / size).ceil() as u32;
        let cols = (width / size).ceil() as u32;

        let mut squares = Vec::new();

        for row in 0..rows {
            for col in 0..cols {
                let x_pos = col as f64 * size;
                let y_pos = row as f64 * size;

                let anchor = ShapeMask::tile_anchor(x_pos, y_pos, size);
                if !ctx.is_point_in_path(anchor.x, anchor.y) {
                    continue;
                }

                let center = Point::new(x_pos + size / 2.0, y_pos + size / 2.0);
                let distance = mask.distance_to_boundary(center);
                squares.push(Square::new(x_pos, y_pos).with_distance(distance));
            }
        }

        let (min_distance, max_distance) = assign_distance_percentages(&mut squares);
        debug!(
            cells = squares.len(),
            min_distance, max_distance, "masked grid built"
        );
        self.squares = squares;
    }

    /// Draw one frame of the fade grid.
    pub fn animate_squares<C: DrawingContext>(
        &mut self,
        ctx: &mut C,
        state: &CanvasState,
        timestamp: f64,
    ) {
        ctx.clear_rect(0.0, 0.0, ctx.width(), ctx.height());
        let size = state.tile_size.pixels();
        let color = state.colors.idle;

        for square in &mut self.squares {
            if let Some(percentage) = square.distance_percentage
                && !square.fade.animating
            {
                let trigger = if percentage >= FIRST_ANIMATION_THRESHOLD {
                    square.fade.first_animation
                } else {
                    let frequency = (1.0 - percentage as f64 / 100.0) * TRIGGER_RATE;
                    self.rng.gen_bool(frequency)
                };
                if trigger {
                    square.fade = square.fade.trigger(timestamp);
                }
            }

            square.fade = square.fade.step(FadeCurve::Reveal, timestamp).state;

            // Pointer proximity wins for this frame only; the cell itself settles at rest.
            let hover = state
                .pointer
                .map(|pointer| mask_opacity(pointer_distance(pointer, square, state.tile_size)))
                .filter(|&opacity| opacity < 1.0);
            match hover {
                Some(opacity) => {
                    square.fade = square.fade.interrupted();
                    square.draw_with_opacity(ctx, color, size, opacity);
                }
                None => square.draw(ctx, color, size),
            }
        }
    }
}

/// Rescale every cell's distance into `[0, 100]` across the observed range.
///
/// Leaves the percentage undefined when fewer than two distinct distances
/// exist. Returns the observed `(min, max)`.
pub fn assign_distance_percentages(squares: &mut [Square]) -> (f64, f64) {
    let (min_distance, max_distance) = squares
        .iter()
        .filter_map(|square| square.distance)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        });

    let span = max_distance - min_distance;
    for square in squares.iter_mut() {
        square.distance_percentage = match square.distance {
            Some(distance) if span > 0.0 => {
                Some(((distance - min_distance) / span * 100.0).round() as u8)
            }
            _ => None,
        };
    }
    (min_distance, max_distance)
}

impl Strategy for MaskedFade {
    fn build<C: DrawingContext>(&mut self, ctx: &mut C, state: &CanvasState) {
        self.set_squares(ctx, state);
    }

    fn render<C: DrawingContext>(&mut self, ctx: &mut C, state: &CanvasState, timestamp: f64) {
        self.animate_squares(ctx, state, timestamp);
    }
}
