//! DREAMWALKER: a 2D action-platformer runtime
//!
//! The library is headless. It owns everything that decides where actors
//! end up and who got hit:
//! - `map`: tile/slope query surface and a text-grid implementation
//! - `game`: entity world, actor physics, state machines, collision layers
//! - `scene`: menu / gameplay / pause / death flow around a `Session`
//! - `config`: tunables loaded from RON
//!
//! The `dreamwalker` binary wraps it with a macroquad window, device input
//! and debug drawing.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod clock;
pub mod config;
pub mod game;
pub mod input;
pub mod logging;
pub mod map;
pub mod scene;

pub use clock::{Clock, Frame};
pub use config::{ConfigError, Tuning};
pub use input::{Button, InputFrame, InputState};
pub use map::{LevelData, LevelError, Slope, SlopeKind, TileGrid, TileQuery};
pub use scene::{Scene, SceneManager};
