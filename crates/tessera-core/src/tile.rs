//! Tile sizes and the fixed tuning constants of both grid behaviors.

use serde::{Deserialize, Serialize};

/// Reference tile size the hover radius is tuned for, in pixels.
pub const SQUARE_SIZE_SMALL: f64 = 30.0;

/// Length of one fade leg (0 → 1 or 1 → 0), in milliseconds.
pub const ANIMATION_DURATION_MS: f64 = 2000.0;

/// Distance percentage at or above which a cell fades in once on its own.
pub const FIRST_ANIMATION_THRESHOLD: u8 = 75;

/// Per-frame trigger probability of a cell sitting right on the mask boundary.
pub const TRIGGER_RATE: f64 = 0.01;

/// Period of the random activation tick, in milliseconds.
pub const ACTIVATION_INTERVAL_MS: f64 = 500.0;

/// Active subset size at which activation ticks stop adding cells.
pub const MAX_ACTIVE: usize = 10;

/// Chance that an activation tick adds a group instead of a single cell.
pub const GROUP_PROBABILITY: f64 = 0.2;

/// Pointer distance (in reference-size pixels) over which hover effects fade out.
pub const HOVER_RADIUS: f64 = 100.0;

/// Canvas width at or below which the mask apex sits at x = 0.
pub const MASK_MIN_WIDTH: f64 = 320.0;

/// Canvas width at or above which the mask apex sits at a third of the width.
pub const MASK_MAX_WIDTH: f64 = 1440.0;

/// Edge length of one grid tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileSize {
    Small,
    #[default]
    Large,
}

impl TileSize {
    /// Edge length in pixels.
    pub fn pixels(self) -> f64 {
        match self {
            TileSize::Small => SQUARE_SIZE_SMALL,
            TileSize::Large => 60.0,
        }
    }

    /// Scale of this size relative to [`SQUARE_SIZE_SMALL`].
    pub fn hover_ratio(self) -> f64 {
        self.pixels() / SQUARE_SIZE_SMALL
    }
}
