//! Level files
//!
//! A level is a RON document holding the tile rows plus spawn points.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TileGrid;
use crate::game::enemy::EnemyKind;

/// Error type for level loading
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid level: {0}")]
    Invalid(String),
}

/// Where an enemy starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub kind: EnemyKind,
}

/// Serialized level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    pub tile_width: f32,
    pub tile_height: f32,
    /// Tile rows, top to bottom (`.` empty, `#` solid, `/` and `\` slopes)
    pub rows: Vec<String>,
    /// Top-left of the player's collision box
    pub player_spawn: (f32, f32),
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
}

impl LevelData {
    /// Load and validate a level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let text = fs::read_to_string(path.as_ref())?;
        let level = Self::from_ron_str(&text)?;
        log::info!(
            "Loaded level '{}' ({} rows, {} enemies) from {}",
            level.name,
            level.rows.len(),
            level.enemies.len(),
            path.as_ref().display()
        );
        Ok(level)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, LevelError> {
        let level: LevelData = ron::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_ron_string(&self) -> Result<String, LevelError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if !(self.tile_width > 0.0 && self.tile_height > 0.0) {
            return Err(LevelError::Invalid(format!(
                "tile size must be positive (got {}x{})",
                self.tile_width, self.tile_height
            )));
        }
        let Some(first) = self.rows.first() else {
            return Err(LevelError::Invalid("level has no rows".into()));
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(LevelError::Invalid("level rows are empty".into()));
        }
        if let Some((i, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.chars().count() != width)
        {
            return Err(LevelError::Invalid(format!(
                "row {} is {} tiles wide, expected {}",
                i,
                row.chars().count(),
                width
            )));
        }
        Ok(())
    }

    pub fn grid(&self) -> TileGrid {
        TileGrid::from_rows(&self.rows, self.tile_width, self.tile_height)
    }

    /// Built-in test level: flat floor, a half-height ledge, a ramped
    /// plateau and a floating platform with a turret on it.
    pub fn demo() -> Self {
        let rows = [
            "########################################",
            "#......................................#",
            "#......................................#",
            "#......................................#",
            "#......................................#",
            "#......................................#",
            "#......................................#",
            "#......................................#",
            "#......................................#",
            "#...........................######.....#",
            "#......................................#",
            "#......................................#",
            "#................/####\\................#",
            "#.........#...../######\\...............#",
            "########################################",
        ];
        Self {
            name: "Demo".into(),
            tile_width: 32.0,
            tile_height: 32.0,
            rows: rows.iter().map(|r| r.to_string()).collect(),
            player_spawn: (64.0, 400.0),
            enemies: vec![
                EnemySpawn { x: 608.0, y: 352.0, kind: EnemyKind::Scientist },
                EnemySpawn { x: 830.0, y: 416.0, kind: EnemyKind::Grunt },
                EnemySpawn { x: 960.0, y: 256.0, kind: EnemyKind::Gangster },
                EnemySpawn { x: 1150.0, y: 416.0, kind: EnemyKind::Brute },
            ],
        }
    }
}
