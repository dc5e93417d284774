//! Animation engine for the tessera tile background.
//!
//! This crate provides the grid cell with its fade state machine, the shape
//! mask geometry, a frame scheduler with a pluggable drawing [`Strategy`],
//! and the two grid behaviors: a shape-masked fade grid ([`MaskedFade`]) and
//! a fully tiled grid with random activation and a pointer spotlight
//! ([`RandomActivation`]). [`TerminalSurface`] is the drawing surface the
//! terminal host renders through.

mod hover;
mod interval;
mod mask;
mod scheduler;
mod square;
mod strategies;
mod surface;

pub use hover::{cell_under, highlight_opacity, mask_opacity, pointer_distance};
pub use interval::Interval;
pub use mask::{ShapeMask, compute_start_x};
pub use scheduler::{CanvasState, FrameHandle, FrameRequester, Lifecycle, Scheduler, Strategy};
pub use square::{FadeCurve, FadeState, GridCoord, Square, Transition};
pub use strategies::{GroupShape, MaskedFade, RandomActivation, assign_distance_percentages};
pub use surface::{CELL_HEIGHT_PX, CELL_WIDTH_PX, TerminalSurface};
