//! DREAMWALKER host
//!
//! Opens a window, polls devices into the library's semantic input, runs
//! the scene manager once per frame and draws debug shapes.

mod host;

use std::path::PathBuf;

use clap::Parser;
use macroquad::prelude::*;

use dreamwalker::config::Tuning;
use dreamwalker::map::{LevelData, TileQuery};
use dreamwalker::scene::SceneManager;
use dreamwalker::{logging, VERSION};

#[derive(Parser, Debug)]
#[command(name = "dreamwalker", version, about = "2D action-platformer runtime")]
struct Cli {
    /// Level file (RON). Defaults to the built-in demo level.
    #[arg(long, value_name = "FILE")]
    level: Option<PathBuf>,

    /// Tuning file (RON). Missing fields keep their defaults.
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long)]
    verbose: bool,
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("DREAMWALKER v{}", VERSION),
        window_width: host::VIEW_WIDTH as i32,
        window_height: host::VIEW_HEIGHT as i32,
        window_resizable: false,
        high_dpi: false,
        ..Default::default()
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(path) {
        Ok(tuning) => {
            log::info!("loaded tuning from {}", path.display());
            tuning
        }
        Err(e) => {
            log::error!("failed to load tuning {}: {}, using defaults", path.display(), e);
            Tuning::default()
        }
    }
}

fn load_level(path: Option<&PathBuf>) -> LevelData {
    let Some(path) = path else {
        return LevelData::demo();
    };
    match LevelData::load(path) {
        Ok(level) => {
            log::info!("loaded level '{}' from {}", level.name, path.display());
            level
        }
        Err(e) => {
            log::error!("failed to load level {}: {}, using the demo level", path.display(), e);
            LevelData::demo()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let cli = Cli::parse();
    logging::init(cli.verbose);
    log::info!("=== DREAMWALKER v{} ===", VERSION);

    let tuning = load_tuning(cli.tuning.as_ref());
    let level = load_level(cli.level.as_ref());
    let mut scenes = SceneManager::new(level, tuning);
    let mut camera = host::Camera::default();

    loop {
        let input = host::poll_input(camera.offset);
        scenes.update(get_frame_time(), input);

        if let Some(session) = scenes.session() {
            if let Some(body) = session.player_body() {
                camera.follow(body.center(), session.map.world_size());
            }
        }
        host::draw_frame(&scenes, &camera);

        next_frame().await;
    }
}
