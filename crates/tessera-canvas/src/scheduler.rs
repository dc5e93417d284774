//! Frame scheduling and lifecycle shared by both grid behaviors.

use tessera_core::{ColorScheme, DrawingContext, Palette, Point, SchemePalette, TileSize};
use tracing::debug;

/// Handle to a frame requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host frame scheduler: delivers one callback per display refresh.
pub trait FrameRequester {
    /// Ask for the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Lifecycle of a scheduler. A torn-down scheduler never runs again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Running,
    TornDown,
}

/// State shared with the drawing strategy every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub color_scheme: ColorScheme,
    pub palette: Palette,
    /// Colors resolved for `color_scheme`.
    pub colors: SchemePalette,
    /// Pointer position; `None` while the pointer is off the surface.
    pub pointer: Option<Point>,
    pub tile_size: TileSize,
}

impl CanvasState {
    pub fn new(color_scheme: ColorScheme, pointer: Option<Point>) -> Self {
        let palette = Palette::default();
        Self {
            color_scheme,
            palette,
            colors: palette.for_scheme(color_scheme),
            pointer,
            tile_size: TileSize::default(),
        }
    }

    fn resolve_colors(&mut self) {
        self.colors = self.palette.for_scheme(self.color_scheme);
    }
}

/// A grid behavior plugged into the [`Scheduler`].
pub trait Strategy {
    /// (Re)build the grid for the surface's current size.
    fn build<C: DrawingContext>(&mut self, ctx: &mut C, state: &CanvasState);

    /// Draw one frame.
    fn render<C: DrawingContext>(&mut self, ctx: &mut C, state: &CanvasState, timestamp: f64);
}

/// Owns the canvas state and drives a [`Strategy`] once per frame.
#[derive(Debug)]
pub struct Scheduler<S> {
    state: CanvasState,
    strategy: S,
    lifecycle: Lifecycle,
    pending_frame: Option<FrameHandle>,
}

impl<S: Strategy> Scheduler<S> {
    pub fn new(strategy: S, color_scheme: ColorScheme, pointer: Option<Point>) -> Self {
        Self {
            state: CanvasState::new(color_scheme, pointer),
            strategy,
            lifecycle: Lifecycle::Uninitialized,
            pending_frame: None,
        }
    }

    /// Replace the built-in palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.state.palette = palette;
        self.state.resolve_colors();
        self
    }

    pub fn with_tile_size(mut self, tile_size: TileSize) -> Self {
        self.state.tile_size = tile_size;
        self
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Enter `Running`: resolve colors, build the grid and request the first frame.
    ///
    /// Only an uninitialized scheduler can be mounted.
    pub fn mount<C: DrawingContext, F: FrameRequester>(&mut self, ctx: &mut C, frames: &mut F) {
        if self.lifecycle != Lifecycle::Uninitialized {
            debug!(lifecycle = ?self.lifecycle, "mount ignored");
            return;
        }
        self.state.resolve_colors();
        self.strategy.build(ctx, &self.state);
        self.pending_frame = Some(frames.request_frame());
        self.lifecycle = Lifecycle::Running;
        debug!(width = ctx.width(), height = ctx.height(), "canvas mounted");
    }

    /// Draw one frame at `timestamp` (milliseconds) and request the next one.
    pub fn run<C: DrawingContext, F: FrameRequester>(
        &mut self,
        ctx: &mut C,
        timestamp: f64,
        frames: &mut F,
    ) {
        if !self.is_running() {
            return;
        }
        self.strategy.render(ctx, &self.state, timestamp);
        self.pending_frame = Some(frames.request_frame());
    }

    /// Rebuild the grid after the surface has been resized.
    pub fn resize<C: DrawingContext>(&mut self, ctx: &mut C) {
        if !self.is_running() {
            return;
        }
        self.strategy.build(ctx, &self.state);
        debug!(width = ctx.width(), height = ctx.height(), "canvas resized");
    }

    /// Cancel the pending frame and stop for good.
    pub fn teardown<F: FrameRequester>(&mut self, frames: &mut F) {
        if let Some(handle) = self.pending_frame.take() {
            frames.cancel_frame(handle);
        }
        self.lifecycle = Lifecycle::TornDown;
        debug!("canvas torn down");
    }

    /// Takes effect from the next frame.
    pub fn set_color_scheme(&mut self, color_scheme: ColorScheme) {
        self.state.color_scheme = color_scheme;
        self.state.resolve_colors();
    }

    /// Update the pointer; `None` disables hover effects.
    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.state.pointer = pointer;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Frame requester that records requests and cancellations.
    #[derive(Debug, Default)]
    pub struct ManualFrames {
        next: u64,
        pub requested: Vec<FrameHandle>,
        pub cancelled: Vec<FrameHandle>,
    }

    impl FrameRequester for ManualFrames {
        fn request_frame(&mut self) -> FrameHandle {
            self.next += 1;
            let handle = FrameHandle(self.next);
            self.requested.push(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }
}
