//! Fully tiled grid with random activation and a pointer spotlight.
//!
//! Every tile of the surface is a cell. A fixed-period activation tick adds
//! random cells (or small groups) to the active subset; active cells pulse
//! once and leave the subset when they come back to rest.

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tessera_core::{ACTIVATION_INTERVAL_MS, DrawingContext, GROUP_PROBABILITY, MAX_ACTIVE};
use tracing::{debug, warn};

use crate::hover::{cell_under, highlight_opacity, pointer_distance};
use crate::interval::Interval;
use crate::scheduler::{CanvasState, Scheduler, Strategy};
use crate::square::{FadeCurve, GridCoord, Square};

/// Opacity of the highlight trail one tile above the hovered cell.
const HOVER_TRAIL_OPACITY: f64 = 0.8;

/// Shape of a group activated together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupShape {
    /// 2×2 block.
    Block,
    /// Anchor and its right neighbor.
    Horizontal,
    /// Anchor and the cell below it.
    Vertical,
}

impl GroupShape {
    pub const ALL: [GroupShape; 3] = [
        GroupShape::Block,
        GroupShape::Horizontal,
        GroupShape::Vertical,
    ];

    fn offsets(self) -> &'static [(u32, u32)] {
        match self {
            GroupShape::Block => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            GroupShape::Horizontal => &[(0, 0), (1, 0)],
            GroupShape::Vertical => &[(0, 0), (0, 1)],
        }
    }
}

/// The random activation behavior.
#[derive(Debug)]
pub struct RandomActivation {
    squares: Vec<Square>,
    /// Grid coordinates to index in `squares`.
    index: HashMap<GridCoord, usize>,
    /// Active subset, in activation order.
    active: Vec<GridCoord>,
    rng: StdRng,
}

impl Default for RandomActivation {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomActivation {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic activation sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            squares: Vec::new(),
            index: HashMap::new(),
            active: Vec::new(),
            rng,
        }
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn active(&self) -> &[GridCoord] {
        &self.active
    }

    pub fn square(&self, coord: GridCoord) -> Option<&Square> {
        self.index.get(&coord).map(|&i| &self.squares[i])
    }

    /// Tile the whole surface, carrying active cells over by grid coordinates.
    pub fn draw_squares<C: DrawingContext>(&mut self, ctx: &mut C, state: &CanvasState) {
        let size = state.tile_size.pixels();
        let num_x = (ctx.width() / size).ceil() as u32;
        let num_y = (ctx.height() / size).ceil() as u32;

        let active = &self.active;
        let mut carried: HashMap<GridCoord, Square> = std::mem::take(&mut self.squares)
            .into_iter()
            .filter_map(|square| {
                let coord = square.grid.filter(|coord| active.contains(coord))?;
                Some((coord, square))
            })
            .collect();

        let mut squares = Vec::with_capacity((num_x * num_y) as usize);
        let mut index = HashMap::with_capacity(squares.capacity());
        for y in 0..num_y {
            for x in 0..num_x {
                let coord = GridCoord::new(x, y);
                let square = carried
                    .remove(&coord)
                    .unwrap_or_else(|| Square::at(coord, size));
                square.draw_with_opacity(ctx, state.colors.idle, size, 1.0);
                index.insert(coord, squares.len());
                squares.push(square);
            }
        }

        self.active.retain(|coord| index.contains_key(coord));
        self.squares = squares;
        self.index = index;
        debug!(
            cells = self.squares.len(),
            active = self.active.len(),
            "tiled grid built"
        );
    }

    /// Cells of `shape` anchored at `anchor` that exist in the grid.
    pub fn group(&self, anchor: GridCoord, shape: GroupShape) -> Vec<GridCoord> {
        shape
            .offsets()
            .iter()
            .filter_map(|&(dx, dy)| anchor.offset(dx, dy))
            .filter(|coord| self.index.contains_key(coord))
            .collect()
    }

    fn random_group(&mut self, anchor: GridCoord) -> Vec<GridCoord> {
        let shape = GroupShape::ALL[self.rng.gen_range(0..GroupShape::ALL.len())];
        self.group(anchor, shape)
    }

    /// One activation tick: add a random cell or group while the subset has room.
    pub fn set_active(&mut self) {
        if self.squares.is_empty() || self.active.len() >= MAX_ACTIVE {
            return;
        }

        let anchor = &self.squares[self.rng.gen_range(0..self.squares.len())];
        let Some(coord) = anchor.grid else {
            warn!(
                x = anchor.x_pos,
                y = anchor.y_pos,
                "invalid square coordinates, skipping activation"
            );
            return;
        };

        let picks = if self.rng.gen_bool(GROUP_PROBABILITY) {
            self.random_group(coord)
        } else {
            vec![coord]
        };
        self.activate(&picks);
    }

    /// Add cells to the active subset, skipping members and stopping at capacity.
    pub fn activate(&mut self, coords: &[GridCoord]) {
        for &coord in coords {
            if self.active.len() >= MAX_ACTIVE {
                break;
            }
            if self.index.contains_key(&coord) && !self.active.contains(&coord) {
                self.active.push(coord);
            }
        }
    }

    /// Background fill plus the pointer spotlight.
    pub fn draw_hover<C: DrawingContext>(&self, ctx: &mut C, state: &CanvasState) {
        ctx.set_fill_style(state.colors.idle.into());
        ctx.fill_rect(0.0, 0.0, ctx.width(), ctx.height());

        let Some(pointer) = state.pointer else {
            return;
        };
        let size = state.tile_size.pixels();
        let hover = state.colors.hover;

        for square in &self.squares {
            let opacity = highlight_opacity(pointer_distance(pointer, square, state.tile_size));
            if opacity > 0.0 {
                square.draw_with_opacity(ctx, hover, size, opacity);
            }
        }

        if let Some(square) = cell_under(pointer, state.tile_size).and_then(|c| self.square(c)) {
            square.draw_with_opacity(ctx, hover, size, 1.0);
            ctx.set_fill_style(hover.with_alpha(HOVER_TRAIL_OPACITY));
            ctx.fill_rect(square.x_pos, square.y_pos - size, size, size);
        }
    }

    /// Advance every active cell; finished cells leave the subset.
    pub fn animate_squares<C: DrawingContext>(
        &mut self,
        ctx: &mut C,
        state: &CanvasState,
        timestamp: f64,
    ) {
        let size = state.tile_size.pixels();
        let color = state.colors.pulse;

        for coord in self.active.clone() {
            let Some(&i) = self.index.get(&coord) else {
                continue;
            };
            let active = &mut self.active;
            self.squares[i].animate(ctx, timestamp, FadeCurve::Pulse, color, size, || {
                active.retain(|c| *c != coord)
            });
        }
    }
}

impl Strategy for RandomActivation {
    fn build<C: DrawingContext>(&mut self, ctx: &mut C, state: &CanvasState) {
        self.draw_squares(ctx, state);
    }

    fn render<C: DrawingContext>(&mut self, ctx: &mut C, state: &CanvasState, timestamp: f64) {
        self.draw_hover(ctx, state);
        self.animate_squares(ctx, state, timestamp);
    }
}

impl Scheduler<RandomActivation> {
    /// Start the activation interval. The host polls it and must cancel it on teardown.
    pub fn set_active_squares(&self, now: f64) -> Interval {
        Interval::new(ACTIVATION_INTERVAL_MS, now)
    }

    /// Run one activation tick while running.
    pub fn activation_tick(&mut self) {
        if self.is_running() {
            self.strategy_mut().set_active();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TerminalSurface;
    use crate::scheduler::testing::ManualFrames;
    use crate::square::FadeState;
    use tessera_core::{ColorScheme, Point};

    fn state() -> CanvasState {
        CanvasState::new(ColorScheme::Light, None)
    }

    fn built(width: f64, height: f64, seed: u64) -> (RandomActivation, TerminalSurface) {
        let mut surface = TerminalSurface::with_pixel_size(width, height);
        let mut strategy = RandomActivation::with_seed(seed);
        strategy.draw_squares(&mut surface, &state());
        (strategy, surface)
    }

    #[test]
    fn test_partial_tiles_are_kept() {
        let (strategy, _) = built(130.0, 120.0, 1);
        assert_eq!(strategy.squares().len(), 6);
        assert!(strategy.square(GridCoord::new(2, 1)).is_some());
    }

    #[test]
    fn test_two_by_two_tiling() {
        let (strategy, _) = built(120.0, 120.0, 1);
        let coords: Vec<GridCoord> = strategy.squares().iter().filter_map(|s| s.grid).collect();
        assert_eq!(
            coords,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(1, 0),
                GridCoord::new(0, 1),
                GridCoord::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_block_group_at_origin_selects_all_four() {
        let (strategy, _) = built(120.0, 120.0, 1);
        let mut group = strategy.group(GridCoord::new(0, 0), GroupShape::Block);
        group.sort();
        assert_eq!(
            group,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(0, 1),
                GridCoord::new(1, 0),
                GridCoord::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_groups_are_clipped_at_grid_edge() {
        let (strategy, _) = built(120.0, 120.0, 1);
        assert_eq!(
            strategy.group(GridCoord::new(1, 1), GroupShape::Block),
            vec![GridCoord::new(1, 1)]
        );
        assert_eq!(
            strategy.group(GridCoord::new(0, 1), GroupShape::Horizontal),
            vec![GridCoord::new(0, 1), GridCoord::new(1, 1)]
        );
        assert_eq!(
            strategy.group(GridCoord::new(1, 0), GroupShape::Vertical),
            vec![GridCoord::new(1, 0), GridCoord::new(1, 1)]
        );
    }

    #[test]
    fn test_active_subset_capped_after_every_tick() {
        let (mut strategy, _) = built(640.0, 480.0, 9);
        for _ in 0..200 {
            strategy.set_active();
            assert!(strategy.active().len() <= MAX_ACTIVE);
        }
        assert_eq!(strategy.active().len(), MAX_ACTIVE);

        let mut unique = strategy.active().to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), strategy.active().len());
    }

    #[test]
    fn test_tick_on_empty_grid_is_noop() {
        let (mut strategy, _) = built(0.0, 0.0, 1);
        strategy.set_active();
        assert!(strategy.active().is_empty());
    }

    #[test]
    fn test_anchor_without_coordinates_is_skipped() {
        let (mut strategy, _) = built(0.0, 0.0, 1);
        strategy.squares = vec![Square::new(0.0, 0.0)];
        for _ in 0..20 {
            strategy.set_active();
        }
        assert!(strategy.active().is_empty());
    }

    #[test]
    fn test_completed_cell_leaves_subset_same_frame() {
        let (mut strategy, mut surface) = built(120.0, 120.0, 1);
        let state = state();
        strategy.activate(&[GridCoord::new(1, 0)]);

        strategy.animate_squares(&mut surface, &state, 1000.0);
        strategy.animate_squares(&mut surface, &state, 3000.0);
        assert_eq!(strategy.active(), &[GridCoord::new(1, 0)]);
        let square = strategy.square(GridCoord::new(1, 0)).expect("exists");
        assert!((square.opacity() - 1.0).abs() < 1e-9);

        strategy.animate_squares(&mut surface, &state, 5000.0);
        assert!(strategy.active().is_empty());
        let square = strategy.square(GridCoord::new(1, 0)).expect("exists");
        assert_eq!(square.opacity(), 0.0);
        assert!(!square.fade.animating);

        // Free for re-activation.
        strategy.activate(&[GridCoord::new(1, 0)]);
        assert_eq!(strategy.active().len(), 1);
    }

    #[test]
    fn test_rebuild_carries_active_cells() {
        let (mut strategy, mut surface) = built(240.0, 240.0, 1);
        let state = state();
        let coord = GridCoord::new(2, 2);
        strategy.activate(&[coord, GridCoord::new(3, 3)]);
        strategy.animate_squares(&mut surface, &state, 0.0);
        strategy.animate_squares(&mut surface, &state, 500.0);
        let before = strategy.square(coord).expect("exists").fade;
        assert!(before.animating);

        // Shrink so (3, 3) falls off the grid.
        let mut smaller = TerminalSurface::with_pixel_size(180.0, 180.0);
        strategy.draw_squares(&mut smaller, &state);
        assert_eq!(strategy.active(), &[coord]);
        assert_eq!(strategy.square(coord).expect("exists").fade, before);
        assert_eq!(
            strategy.square(GridCoord::new(0, 0)).expect("exists").fade,
            FadeState::default()
        );
    }

    #[test]
    fn test_hover_spotlight() {
        let (strategy, mut surface) = built(480.0, 480.0, 1);
        let mut state = state();
        state.pointer = Some(Point::new(90.0, 150.0));
        strategy.draw_hover(&mut surface, &state);

        let hover = state.colors.hover;
        let idle = state.colors.idle;
        // Cell under the pointer is fully highlighted.
        assert_eq!(surface.sample_at(90.0, 150.0), Some(hover));
        // The cell above carries the fainter trail.
        let trail = surface.sample_at(90.0, 90.0).expect("painted");
        assert_ne!(trail, idle);
        // Far corner stays at the idle fill.
        assert_eq!(surface.sample_at(470.0, 470.0), Some(idle));
    }

    #[test]
    fn test_no_pointer_paints_background_only() {
        let (strategy, mut surface) = built(120.0, 120.0, 1);
        let state = state();
        strategy.draw_hover(&mut surface, &state);
        assert_eq!(surface.sample_at(60.0, 60.0), Some(state.colors.idle));
    }

    #[test]
    fn test_scheduler_interval_and_ticks() {
        let mut surface = TerminalSurface::with_pixel_size(640.0, 480.0);
        let mut frames = ManualFrames::default();
        let mut scheduler =
            Scheduler::new(RandomActivation::with_seed(5), ColorScheme::Light, None);

        // Ticks before mount do nothing.
        scheduler.activation_tick();
        assert!(scheduler.strategy().active().is_empty());

        scheduler.mount(&mut surface, &mut frames);
        let mut interval = scheduler.set_active_squares(0.0);
        assert_eq!(interval.period_ms(), ACTIVATION_INTERVAL_MS);

        let mut now = 0.0;
        while now < 3000.0 {
            now += 16.0;
            if interval.poll(now) {
                scheduler.activation_tick();
            }
            scheduler.run(&mut surface, now, &mut frames);
        }
        assert!(!scheduler.strategy().active().is_empty());

        interval.cancel();
        scheduler.teardown(&mut frames);
        let before = scheduler.strategy().active().to_vec();
        scheduler.activation_tick();
        assert_eq!(scheduler.strategy().active(), before.as_slice());
    }
}
