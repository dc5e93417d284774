//! Grid cells and their fade state machine.

use tessera_core::{ANIMATION_DURATION_MS, DrawingContext, Rgb};

/// Integer grid coordinates of a cell in the full tiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: u32,
    pub y: u32,
}

impl GridCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Neighbor at the given non-negative offset, if it does not overflow.
    pub fn offset(self, dx: u32, dy: u32) -> Option<GridCoord> {
        Some(GridCoord {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

/// How a fade transition evolves over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeCurve {
    /// One fade-in on the first run, then a dip to 0 and back to 1 on every later run.
    Reveal,
    /// Fade in to 1 and back out to rest at 0.
    Pulse,
}

/// Animation state of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeState {
    /// Current render alpha in `[0, 1]`.
    pub opacity: f64,
    /// True while a transition is in progress.
    pub animating: bool,
    /// Start of the current transition; `None` if none has ever started.
    pub animation_start: Option<f64>,
    /// True until the cell has completed its first fade-in.
    pub first_animation: bool,
}

impl Default for FadeState {
    fn default() -> Self {
        Self {
            opacity: 0.0,
            animating: false,
            animation_start: None,
            first_animation: true,
        }
    }
}

/// Result of advancing a [`FadeState`] by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: FadeState,
    /// Set on exactly the frame where the transition finishes.
    pub completed: bool,
}

impl FadeState {
    /// Start a transition at `timestamp`.
    pub fn trigger(self, timestamp: f64) -> FadeState {
        FadeState {
            animating: true,
            animation_start: Some(timestamp),
            ..self
        }
    }

    /// Stop any transition in progress and settle at rest: hidden before
    /// the first fade-in has completed, fully shown after.
    pub fn interrupted(self) -> FadeState {
        FadeState {
            opacity: if self.first_animation { 0.0 } else { 1.0 },
            animating: false,
            ..self
        }
    }

    /// Advance the state machine to `timestamp` (milliseconds).
    ///
    /// A [`FadeCurve::Pulse`] state that is not animating starts on the first
    /// call; a [`FadeCurve::Reveal`] state only moves once triggered.
    pub fn step(self, curve: FadeCurve, timestamp: f64) -> Transition {
        match curve {
            FadeCurve::Reveal => self.step_reveal(timestamp),
            FadeCurve::Pulse => self.step_pulse(timestamp),
        }
    }

    fn idle(self) -> Transition {
        Transition {
            state: self,
            completed: false,
        }
    }

    fn step_reveal(self, timestamp: f64) -> Transition {
        let (true, Some(start)) = (self.animating, self.animation_start) else {
            return self.idle();
        };
        let leg = ANIMATION_DURATION_MS;
        let elapsed = (timestamp - start).max(0.0);

        if self.first_animation {
            if elapsed >= leg {
                return Transition {
                    state: FadeState {
                        opacity: 1.0,
                        animating: false,
                        first_animation: false,
                        ..self
                    },
                    completed: true,
                };
            }
            return Transition {
                state: FadeState {
                    opacity: elapsed / leg,
                    ..self
                },
                completed: false,
            };
        }

        if elapsed >= 2.0 * leg {
            return Transition {
                state: FadeState {
                    opacity: 1.0,
                    animating: false,
                    ..self
                },
                completed: true,
            };
        }

        let opacity = if elapsed < leg {
            1.0 - elapsed / leg
        } else {
            (elapsed - leg) / leg
        };
        Transition {
            state: FadeState { opacity, ..self },
            completed: false,
        }
    }

    fn step_pulse(self, timestamp: f64) -> Transition {
        let start = match (self.animating, self.animation_start) {
            (true, Some(start)) => start,
            _ => {
                return Transition {
                    state: FadeState {
                        opacity: 0.0,
                        ..self.trigger(timestamp)
                    },
                    completed: false,
                };
            }
        };
        let leg = ANIMATION_DURATION_MS;
        let elapsed = (timestamp - start).max(0.0);

        if elapsed >= 2.0 * leg {
            return Transition {
                state: FadeState {
                    opacity: 0.0,
                    animating: false,
                    animation_start: None,
                    first_animation: false,
                },
                completed: true,
            };
        }

        let opacity = if elapsed < leg {
            elapsed / leg
        } else {
            1.0 - (elapsed - leg) / leg
        };
        Transition {
            state: FadeState { opacity, ..self },
            completed: false,
        }
    }
}

/// One square tile of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Square {
    /// Pixel-space left edge.
    pub x_pos: f64,
    /// Pixel-space top edge.
    pub y_pos: f64,
    /// Grid coordinates, set by the tiling strategy.
    pub grid: Option<GridCoord>,
    /// Raw distance to the mask boundary, set once at grid build.
    pub distance: Option<f64>,
    /// `distance` rescaled to `[0, 100]` across the grid.
    pub distance_percentage: Option<u8>,
    pub fade: FadeState,
}

impl Square {
    pub fn new(x_pos: f64, y_pos: f64) -> Self {
        Self {
            x_pos,
            y_pos,
            grid: None,
            distance: None,
            distance_percentage: None,
            fade: FadeState::default(),
        }
    }

    /// A cell of the full tiling at `coord`.
    pub fn at(coord: GridCoord, size: f64) -> Self {
        Self {
            grid: Some(coord),
            ..Self::new(coord.x as f64 * size, coord.y as f64 * size)
        }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn opacity(&self) -> f64 {
        self.fade.opacity
    }

    /// Paint the cell at its current opacity.
    pub fn draw<C: DrawingContext>(&self, ctx: &mut C, color: Rgb, size: f64) {
        self.draw_with_opacity(ctx, color, size, self.fade.opacity);
    }

    pub(crate) fn draw_with_opacity<C: DrawingContext>(
        &self,
        ctx: &mut C,
        color: Rgb,
        size: f64,
        opacity: f64,
    ) {
        ctx.set_fill_style(color.with_alpha(opacity));
        ctx.fill_rect(self.x_pos, self.y_pos, size, size);
    }

    /// Advance the fade by one frame and draw the result.
    ///
    /// `on_complete` runs only on the frame where the transition finishes.
    pub fn animate<C: DrawingContext>(
        &mut self,
        ctx: &mut C,
        timestamp: f64,
        curve: FadeCurve,
        color: Rgb,
        size: f64,
        on_complete: impl FnOnce(),
    ) {
        let transition = self.fade.step(curve, timestamp);
        self.fade = transition.state;
        self.draw(ctx, color, size);
        if transition.completed {
            on_complete();
        }
    }
}
