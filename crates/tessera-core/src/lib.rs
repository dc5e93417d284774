//! Core types for the tessera tile background.
//!
//! This crate holds the value types shared by the animation engine and the
//! terminal host: color schemes and palettes, the [`DrawingContext`]
//! abstraction every surface implements, and the fixed tuning constants of
//! the two grid behaviors. Pixel-space geometry comes from `kurbo`.

mod color;
mod context;
mod tile;

pub use color::{ColorParseError, ColorScheme, FillStyle, Palette, Rgb, Rgba, SchemePalette};
pub use context::DrawingContext;
pub use kurbo::{BezPath, Point, QuadBez};
pub use tile::{
    ACTIVATION_INTERVAL_MS, ANIMATION_DURATION_MS, FIRST_ANIMATION_THRESHOLD, GROUP_PROBABILITY,
    HOVER_RADIUS, MAX_ACTIVE, MASK_MAX_WIDTH, MASK_MIN_WIDTH, SQUARE_SIZE_SMALL, TRIGGER_RATE,
    TileSize,
};
