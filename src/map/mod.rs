//! Static level geometry
//!
//! The simulation only ever talks to a level through [`TileQuery`]: solid
//! tests, slope lookups and tile dimensions. [`TileGrid`] is the text-backed
//! implementation used by the game and the tests; [`LevelData`] is the RON
//! file that produces one.

mod grid;
mod level;
mod slope;

pub use grid::*;
pub use level::*;
pub use slope::*;

/// Read-only queries against static tile geometry.
///
/// Coordinates outside the map are solid, so the world edge behaves like a
/// wall on every side.
pub trait TileQuery {
    fn tile_width(&self) -> f32;
    fn tile_height(&self) -> f32;

    /// Solid test in tile coordinates. Slope tiles are not solid.
    fn is_solid(&self, tx: i32, ty: i32) -> bool;

    /// Slope occupying a tile, if any.
    fn slope_at(&self, tx: i32, ty: i32) -> Option<Slope>;

    /// World size in pixels (width, height).
    fn world_size(&self) -> (f32, f32);

    /// Tile coordinates containing a world point.
    fn tile_coords(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.tile_width()).floor() as i32,
            (y / self.tile_height()).floor() as i32,
        )
    }

    /// Solid test in world pixels.
    fn is_solid_at_world(&self, x: f32, y: f32) -> bool {
        let (tx, ty) = self.tile_coords(x, y);
        self.is_solid(tx, ty)
    }

    /// True if a world-space rectangle overlaps any solid tile.
    fn rect_hits_solid(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        let (tx0, ty0) = self.tile_coords(x, y);
        // Shave a hair off the far edges so a box resting exactly on a tile
        // boundary doesn't count the neighbour.
        let (tx1, ty1) = self.tile_coords(x + w - 0.001, y + h - 0.001);
        (ty0..=ty1).any(|ty| (tx0..=tx1).any(|tx| self.is_solid(tx, ty)))
    }
}
