//! Slope tiles

use serde::{Deserialize, Serialize};

/// Which way the surface rises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlopeKind {
    /// `/` - surface rises towards the right
    Ascending,
    /// `\` - surface falls towards the right
    Descending,
}

/// A single slope tile, spanning exactly one tile cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slope {
    pub kind: SlopeKind,
    pub tile_x: i32,
    pub tile_y: i32,
    pub width: f32,
    pub height: f32,
}

impl Slope {
    pub fn new(kind: SlopeKind, tile_x: i32, tile_y: i32, width: f32, height: f32) -> Self {
        Self { kind, tile_x, tile_y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.tile_x as f32 * self.width
    }

    pub fn right(&self) -> f32 {
        self.left() + self.width
    }

    pub fn top(&self) -> f32 {
        self.tile_y as f32 * self.height
    }

    pub fn bottom(&self) -> f32 {
        self.top() + self.height
    }

    /// Clamp a world x into this tile's horizontal span.
    pub fn clamp_x(&self, world_x: f32) -> f32 {
        world_x.clamp(self.left(), self.right())
    }

    /// Surface height at `world_x`. The x is clamped to the tile span, so
    /// positions past either edge read the edge height.
    pub fn y_for_x(&self, world_x: f32) -> f32 {
        let t = (self.clamp_x(world_x) - self.left()) / self.width;
        match self.kind {
            SlopeKind::Ascending => self.top() + self.height * (1.0 - t),
            SlopeKind::Descending => self.top() + self.height * t,
        }
    }
}
