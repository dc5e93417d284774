//! Pointer proximity math shared by both grid behaviors.

use tessera_core::{HOVER_RADIUS, Point, TileSize};

use crate::square::{GridCoord, Square};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Distance from the pointer to the center of `square`, expressed in
/// reference-size pixels so hover feels the same for every tile size.
pub fn pointer_distance(pointer: Point, square: &Square, tile: TileSize) -> f64 {
    let size = tile.pixels();
    let ratio = tile.hover_ratio();
    let center = Point::new(square.x_pos + size / 2.0, square.y_pos + size / 2.0);
    pointer.distance(center) / ratio
}

/// Opacity a masked cell is forced to near the pointer: 0 under it, 1 once
/// [`HOVER_RADIUS`] away.
pub fn mask_opacity(distance: f64) -> f64 {
    round2((distance / HOVER_RADIUS).clamp(0.0, 1.0))
}

/// Strength of the highlight glow: 1 under the pointer, 0 once [`HOVER_RADIUS`] away.
pub fn highlight_opacity(distance: f64) -> f64 {
    round2((1.0 - distance / HOVER_RADIUS).max(0.0))
}

/// Grid cell under the pointer, if the pointer is on the surface.
pub fn cell_under(pointer: Point, tile: TileSize) -> Option<GridCoord> {
    if pointer.x < 0.0 || pointer.y < 0.0 {
        return None;
    }
    let size = tile.pixels();
    Some(GridCoord::new(
        (pointer.x / size).floor() as u32,
        (pointer.y / size).floor() as u32,
    ))
}
