//! Text-backed tile grid

use super::{Slope, SlopeKind, TileQuery};

/// Contents of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
    Slope(SlopeKind),
}

impl Tile {
    /// `.` empty, `#` solid, `/` ascending, `\` descending. Anything else is
    /// treated as empty (decoration glyphs, spawn markers).
    pub fn from_glyph(c: char) -> Self {
        match c {
            '#' => Tile::Solid,
            '/' => Tile::Slope(SlopeKind::Ascending),
            '\\' => Tile::Slope(SlopeKind::Descending),
            _ => Tile::Empty,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Solid => '#',
            Tile::Slope(SlopeKind::Ascending) => '/',
            Tile::Slope(SlopeKind::Descending) => '\\',
        }
    }
}

/// Rectangular tile map
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    tile_width: f32,
    tile_height: f32,
    width: usize,
    height: usize,
    /// Row-major cells
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Empty grid of the given size in tiles.
    pub fn new(width: usize, height: usize, tile_width: f32, tile_height: f32) -> Self {
        Self {
            tile_width,
            tile_height,
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    /// Build from text rows. Short rows are padded with empty tiles.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_width: f32, tile_height: f32) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let mut grid = Self::new(width, rows.len(), tile_width, tile_height);
        for (ty, row) in rows.iter().enumerate() {
            for (tx, c) in row.as_ref().chars().enumerate() {
                grid.tiles[ty * width + tx] = Tile::from_glyph(c);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
            return None;
        }
        Some(ty as usize * self.width + tx as usize)
    }

    /// Cell contents; None outside the grid.
    pub fn tile(&self, tx: i32, ty: i32) -> Option<Tile> {
        self.index(tx, ty).map(|i| self.tiles[i])
    }

    /// Overwrite a cell. Out-of-range writes are ignored.
    pub fn set(&mut self, tx: i32, ty: i32, tile: Tile) {
        if let Some(i) = self.index(tx, ty) {
            self.tiles[i] = tile;
        }
    }

    /// Back to text, one string per row.
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().map(|t| t.glyph()).collect())
            .collect()
    }
}

impl TileQuery for TileGrid {
    fn tile_width(&self) -> f32 {
        self.tile_width
    }

    fn tile_height(&self) -> f32 {
        self.tile_height
    }

    fn is_solid(&self, tx: i32, ty: i32) -> bool {
        match self.tile(tx, ty) {
            None => true,
            Some(tile) => tile == Tile::Solid,
        }
    }

    fn slope_at(&self, tx: i32, ty: i32) -> Option<Slope> {
        match self.tile(tx, ty)? {
            Tile::Slope(kind) => Some(Slope::new(kind, tx, ty, self.tile_width, self.tile_height)),
            _ => None,
        }
    }

    fn world_size(&self) -> (f32, f32) {
        (
            self.width as f32 * self.tile_width,
            self.height as f32 * self.tile_height,
        )
    }
}
