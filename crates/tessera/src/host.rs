//! Glue between the terminal event loop and the canvas schedulers.

use std::io;

use color_eyre::eyre::WrapErr;
use tessera_canvas::{
    CELL_HEIGHT_PX, CELL_WIDTH_PX, FrameHandle, FrameRequester, Interval, MaskedFade,
    RandomActivation, Scheduler, TerminalSurface,
};
use tessera_core::{ColorScheme, Point, SchemePalette};
use tracing::debug;

use crate::config::{Config, StrategyKind};

/// Run `body` with the terminal input modes enabled.
///
/// `disable` and `restore` run on every path, including a failed `enable`.
/// The first error wins.
pub fn run_session(
    enable: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> color_eyre::Result<()>,
    disable: impl FnOnce() -> io::Result<()>,
    restore: impl FnOnce(),
) -> color_eyre::Result<()> {
    let result = enable()
        .wrap_err("failed to enable mouse capture")
        .and_then(|()| body());
    let disabled = disable().wrap_err("failed to disable mouse capture");
    restore();
    result.and(disabled)
}

/// Pixel-space center of the terminal cell at `(col, row)`.
pub fn cell_center(col: u16, row: u16) -> Point {
    Point::new(
        (col as f64 + 0.5) * CELL_WIDTH_PX,
        (row as f64 + 0.5) * CELL_HEIGHT_PX,
    )
}

/// Frame requester for a polled event loop: at most one frame is pending.
#[derive(Debug, Default)]
pub struct FrameClock {
    next: u64,
    pending: Option<FrameHandle>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending frame, returning whether one was due.
    pub fn take_due(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }
}

impl FrameRequester for FrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// The mounted background, one of the two grid behaviors.
#[derive(Debug)]
pub enum Background {
    Masked(Scheduler<MaskedFade>),
    Tiled {
        scheduler: Scheduler<RandomActivation>,
        interval: Interval,
    },
}

impl Background {
    /// Construct and mount a fresh background at `now` (milliseconds).
    pub fn mount(
        kind: StrategyKind,
        config: &Config,
        color_scheme: ColorScheme,
        pointer: Option<Point>,
        surface: &mut TerminalSurface,
        frames: &mut FrameClock,
        now: f64,
    ) -> Self {
        debug!(strategy = kind.name(), scheme = color_scheme.name(), "mounting background");
        match kind {
            StrategyKind::Masked => {
                let mut scheduler = Scheduler::new(MaskedFade::new(), color_scheme, pointer)
                    .with_palette(config.palette)
                    .with_tile_size(config.tile_size);
                scheduler.mount(surface, frames);
                Background::Masked(scheduler)
            }
            StrategyKind::Tiled => {
                let mut scheduler = Scheduler::new(RandomActivation::new(), color_scheme, pointer)
                    .with_palette(config.palette)
                    .with_tile_size(config.tile_size);
                scheduler.mount(surface, frames);
                let interval = scheduler.set_active_squares(now);
                Background::Tiled {
                    scheduler,
                    interval,
                }
            }
        }
    }

    #[cfg(test)]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Background::Masked(_) => StrategyKind::Masked,
            Background::Tiled { .. } => StrategyKind::Tiled,
        }
    }

    /// Draw one frame.
    pub fn run(&mut self, surface: &mut TerminalSurface, timestamp: f64, frames: &mut FrameClock) {
        match self {
            Background::Masked(scheduler) => scheduler.run(surface, timestamp, frames),
            Background::Tiled { scheduler, .. } => scheduler.run(surface, timestamp, frames),
        }
    }

    /// Fire the activation tick when the interval is due.
    pub fn poll_activation(&mut self, now: f64) {
        if let Background::Tiled {
            scheduler,
            interval,
        } = self
            && interval.poll(now)
        {
            scheduler.activation_tick();
        }
    }

    pub fn resize(&mut self, surface: &mut TerminalSurface) {
        match self {
            Background::Masked(scheduler) => scheduler.resize(surface),
            Background::Tiled { scheduler, .. } => scheduler.resize(surface),
        }
    }

    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        match self {
            Background::Masked(scheduler) => scheduler.set_pointer(pointer),
            Background::Tiled { scheduler, .. } => scheduler.set_pointer(pointer),
        }
    }

    pub fn set_color_scheme(&mut self, color_scheme: ColorScheme) {
        match self {
            Background::Masked(scheduler) => scheduler.set_color_scheme(color_scheme),
            Background::Tiled { scheduler, .. } => scheduler.set_color_scheme(color_scheme),
        }
    }

    /// Colors resolved for the current scheme.
    pub fn colors(&self) -> SchemePalette {
        match self {
            Background::Masked(scheduler) => scheduler.state().colors,
            Background::Tiled { scheduler, .. } => scheduler.state().colors,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        match self {
            Background::Masked(scheduler) => scheduler.is_running(),
            Background::Tiled { scheduler, .. } => scheduler.is_running(),
        }
    }

    /// Stop the interval and the pending frame. The background cannot be restarted.
    pub fn teardown(&mut self, frames: &mut FrameClock) {
        match self {
            Background::Masked(scheduler) => scheduler.teardown(frames),
            Background::Tiled {
                scheduler,
                interval,
            } => {
                interval.cancel();
                scheduler.teardown(frames);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tessera_canvas::Lifecycle;
    use tessera_core::Palette;

    fn mounted(kind: StrategyKind) -> (Background, TerminalSurface, FrameClock) {
        let mut surface = TerminalSurface::new(80, 24);
        let mut frames = FrameClock::new();
        let background = Background::mount(
            kind,
            &Config::default(),
            ColorScheme::Light,
            None,
            &mut surface,
            &mut frames,
            0.0,
        );
        (background, surface, frames)
    }

    #[test]
    fn test_session_restores_when_enable_fails() {
        let ran = Cell::new(false);
        let restored = Cell::new(false);
        let result = run_session(
            || Err(io::Error::other("no tty")),
            || {
                ran.set(true);
                Ok(())
            },
            || Ok(()),
            || restored.set(true),
        );
        assert!(result.is_err());
        assert!(!ran.get());
        assert!(restored.get());
    }

    #[test]
    fn test_session_restores_when_disable_fails() {
        let restored = Cell::new(false);
        let result = run_session(
            || Ok(()),
            || Ok(()),
            || Err(io::Error::other("closed")),
            || restored.set(true),
        );
        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn test_session_keeps_body_error() {
        let restored = Cell::new(false);
        let result = run_session(
            || Ok(()),
            || Err(color_eyre::eyre::eyre!("draw failed")),
            || Err(io::Error::other("closed")),
            || restored.set(true),
        );
        let err = result.expect_err("body error");
        assert_eq!(err.to_string(), "draw failed");
        assert!(restored.get());
    }

    #[test]
    fn test_cell_center() {
        assert_eq!(cell_center(0, 0), Point::new(4.0, 8.0));
        assert_eq!(cell_center(10, 2), Point::new(84.0, 40.0));
    }

    #[test]
    fn test_frame_clock_single_pending() {
        let mut frames = FrameClock::new();
        assert!(!frames.take_due());

        let first = frames.request_frame();
        let second = frames.request_frame();
        assert_ne!(first, second);
        assert_eq!(frames.pending(), Some(second));

        // Stale handles do not cancel the newer request.
        frames.cancel_frame(first);
        assert_eq!(frames.pending(), Some(second));

        assert!(frames.take_due());
        assert!(!frames.take_due());
    }

    #[test]
    fn test_mount_requests_first_frame() {
        for kind in [StrategyKind::Masked, StrategyKind::Tiled] {
            let (background, _surface, frames) = mounted(kind);
            assert_eq!(background.kind(), kind);
            assert!(background.is_running());
            assert!(frames.pending().is_some());
        }
    }

    #[test]
    fn test_run_requests_next_frame() {
        let (mut background, mut surface, mut frames) = mounted(StrategyKind::Masked);
        assert!(frames.take_due());
        background.run(&mut surface, 16.0, &mut frames);
        assert!(frames.take_due());
    }

    #[test]
    fn test_teardown_cancels_frame_and_interval() {
        let (mut background, mut surface, mut frames) = mounted(StrategyKind::Tiled);
        background.teardown(&mut frames);

        assert!(!background.is_running());
        assert_eq!(frames.pending(), None);

        let Background::Tiled {
            scheduler,
            interval,
        } = &background
        else {
            panic!("expected tiled background");
        };
        assert!(interval.is_cancelled());
        assert_eq!(scheduler.lifecycle(), Lifecycle::TornDown);

        background.poll_activation(10_000.0);
        background.run(&mut surface, 10_000.0, &mut frames);
        assert_eq!(frames.pending(), None);
    }

    #[test]
    fn test_activation_fires_on_interval() {
        let (mut background, _surface, _frames) = mounted(StrategyKind::Tiled);
        let active = |background: &Background| match background {
            Background::Tiled { scheduler, .. } => scheduler.strategy().active().len(),
            Background::Masked(_) => 0,
        };

        background.poll_activation(100.0);
        assert_eq!(active(&background), 0);

        background.poll_activation(500.0);
        assert!(active(&background) >= 1);
    }

    #[test]
    fn test_color_scheme_switch() {
        let (mut background, _surface, _frames) = mounted(StrategyKind::Masked);
        assert_eq!(background.colors(), Palette::default().light);
        background.set_color_scheme(ColorScheme::Dark);
        assert_eq!(background.colors(), Palette::default().dark);
    }
}
