//! The two grid behaviors.

mod masked;
mod tiled;

pub use masked::{MaskedFade, assign_distance_percentages};
pub use tiled::{GroupShape, RandomActivation};
