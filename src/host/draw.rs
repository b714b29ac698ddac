//! Debug rendering
//!
//! Flat rectangles for everything: tiles, bodies, hitboxes. Good enough to
//! see what the simulation is doing; sprites are not this crate's concern.

use glam::Vec2;
use macroquad::math::vec2;
use macroquad::prelude::*;

use dreamwalker::game::{Body, Entity, Layer, Session, StateId};
use dreamwalker::map::{SlopeKind, Tile, TileQuery};
use dreamwalker::scene::{Scene, SceneManager};

use super::{Camera, VIEW_HEIGHT, VIEW_WIDTH};

const BACKGROUND: Color = Color::new(0.07, 0.06, 0.11, 1.0);
const TILE: Color = Color::new(0.28, 0.26, 0.36, 1.0);
const SLOPE: Color = Color::new(0.36, 0.33, 0.45, 1.0);
const DREAM: Color = Color::new(0.75, 0.45, 1.0, 1.0);

const MANUAL: &[&str] = &[
    "A / D or arrows: move",
    "Space: jump        Shift: roll",
    "Left mouse: attack (hold a direction to aim it)",
    "Right mouse near an enemy: Dash Strike, release in the gold zone",
    "E: dream state (needs meter)  Left mouse while dreaming: Dream Slash",
    "Escape: pause",
    "",
    "Enter or Escape to go back",
];

pub fn draw_frame(scenes: &SceneManager, camera: &Camera) {
    clear_background(BACKGROUND);
    match scenes.scene() {
        Scene::Menu if scenes.manual_open() => draw_manual(),
        Scene::Menu => draw_menu(scenes),
        scene => {
            if let Some(session) = scenes.session() {
                draw_world(session, camera);
                draw_hud(session, camera);
            }
            if scene != Scene::Playing {
                draw_rectangle(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT, Color::new(0.0, 0.0, 0.0, 0.55));
                draw_menu(scenes);
            }
        }
    }
}

// =============================================================================
// Menus
// =============================================================================

fn centered(text: &str, y: f32, size: u16, color: Color) {
    let dims = measure_text(text, None, size, 1.0);
    draw_text(text, (VIEW_WIDTH - dims.width) * 0.5, y, size as f32, color);
}

fn draw_menu(scenes: &SceneManager) {
    let scene = scenes.scene();
    centered(scene.title(), VIEW_HEIGHT * 0.35, 48, WHITE);
    let selected = scenes.selected();
    for (i, item) in scene.menu().iter().enumerate() {
        let y = VIEW_HEIGHT * 0.5 + i as f32 * 36.0;
        if Some(*item) == selected {
            centered(&format!("> {} <", item.label()), y, 28, GOLD);
        } else {
            centered(item.label(), y, 28, LIGHTGRAY);
        }
    }
}

fn draw_manual() {
    centered("Manual", 80.0, 40, WHITE);
    for (i, line) in MANUAL.iter().enumerate() {
        draw_text(line, 120.0, 150.0 + i as f32 * 30.0, 24.0, LIGHTGRAY);
    }
}

// =============================================================================
// World
// =============================================================================

fn draw_world(session: &Session, camera: &Camera) {
    draw_tiles(session, camera);
    let world = &session.world;
    for &entity in world.entities() {
        if world.is_despawning(entity) {
            continue;
        }
        let (Some(body), Some(collider)) = (world.bodies.get(entity), world.colliders.get(entity)) else {
            continue;
        };
        let rect = collider.bounds(body.pos);
        let p = camera.to_screen(Vec2::new(rect.x, rect.y));
        match collider.layer {
            Layer::Player | Layer::PlayerRolling => draw_player(session, body, p, collider.layer),
            Layer::Enemy => draw_enemy(session, entity, body, p),
            Layer::PlayerAttack => draw_rectangle_lines(p.x, p.y, rect.w, rect.h, 2.0, YELLOW),
            Layer::EnemyAttack => draw_rectangle_lines(p.x, p.y, rect.w, rect.h, 2.0, ORANGE),
            Layer::EnemyProjectile => {
                draw_circle(p.x + rect.w * 0.5, p.y + rect.h * 0.5, rect.w * 0.5 + 1.0, RED)
            }
            Layer::Default => draw_rectangle_lines(p.x, p.y, rect.w, rect.h, 1.0, GRAY),
        }
    }
}

fn draw_tiles(session: &Session, camera: &Camera) {
    let map = &session.map;
    let (tw, th) = (map.tile_width(), map.tile_height());
    let first_col = (camera.offset.x / tw).floor() as i32;
    let first_row = (camera.offset.y / th).floor() as i32;
    let cols = (VIEW_WIDTH / tw).ceil() as i32 + 1;
    let rows = (VIEW_HEIGHT / th).ceil() as i32 + 1;

    for ty in first_row..first_row + rows {
        for tx in first_col..first_col + cols {
            let p = camera.to_screen(Vec2::new(tx as f32 * tw, ty as f32 * th));
            match map.tile(tx, ty) {
                Some(Tile::Solid) => draw_rectangle(p.x, p.y, tw, th, TILE),
                Some(Tile::Slope(kind)) => {
                    let (bl, br) = (vec2(p.x, p.y + th), vec2(p.x + tw, p.y + th));
                    let peak = match kind {
                        SlopeKind::Ascending => vec2(p.x + tw, p.y),
                        SlopeKind::Descending => vec2(p.x, p.y),
                    };
                    draw_triangle(bl, br, peak, SLOPE);
                }
                _ => {}
            }
        }
    }
}

fn draw_player(session: &Session, body: &Body, p: Vec2, layer: Layer) {
    let dreaming = session.pilot().is_some_and(|pilot| pilot.dreaming);
    let mut color = if dreaming { DREAM } else { SKYBLUE };
    if layer == Layer::PlayerRolling {
        color.a = 0.5;
    }
    if session.player_health().is_some_and(|h| h.invulnerable) {
        color = Color::new(color.r, color.g, color.b, 0.6);
    }
    draw_rectangle(p.x, p.y, body.size.x, body.size.y, color);
    let eye_x = p.x + body.size.x * 0.5 + body.facing.sign() * body.size.x * 0.3;
    draw_circle(eye_x, p.y + 12.0, 3.0, WHITE);
}

fn draw_enemy(session: &Session, entity: Entity, body: &Body, p: Vec2) {
    let world = &session.world;
    draw_rectangle(p.x, p.y, body.size.x, body.size.y, MAROON);
    if let Some(enemy) = world.enemies.get(entity) {
        draw_text(enemy.kind.name(), p.x, p.y - 10.0, 16.0, LIGHTGRAY);
    }
    if let Some(health) = world.health.get(entity) {
        draw_rectangle(p.x, p.y - 6.0, body.size.x, 3.0, DARKGRAY);
        draw_rectangle(p.x, p.y - 6.0, body.size.x * health.fraction(), 3.0, RED);
    }
}

// =============================================================================
// HUD
// =============================================================================

fn bar(x: f32, y: f32, w: f32, fill: f32, color: Color) {
    draw_rectangle(x, y, w, 10.0, DARKGRAY);
    draw_rectangle(x, y, w * fill.clamp(0.0, 1.0), 10.0, color);
    draw_rectangle_lines(x, y, w, 10.0, 1.0, WHITE);
}

fn draw_hud(session: &Session, camera: &Camera) {
    if let Some(health) = session.player_health() {
        bar(16.0, 16.0, 200.0, health.fraction(), RED);
    }
    let Some(pilot) = session.pilot() else {
        return;
    };
    let dream = &pilot.tuning.dream;
    bar(16.0, 32.0, 200.0, pilot.meter / dream.meter_max, DREAM);
    if pilot.dreaming {
        draw_text("DREAM", 224.0, 42.0, 18.0, DREAM);
    }

    let state = session.player_state();
    let label = state.map_or_else(|| "-".to_string(), |s| format!("{:?}", s));
    draw_text(&format!("{}  {} fps", label, get_fps()), 16.0, 64.0, 18.0, LIGHTGRAY);

    match state {
        Some(StateId::DashStrikeAim) => {
            let dash = &pilot.tuning.dash_strike;
            let (x, y, w) = (VIEW_WIDTH * 0.5 - 150.0, VIEW_HEIGHT - 60.0, 300.0);
            bar(x, y, w, pilot.aim_progress, SKYBLUE);
            let start = x + w * dash.sweet_spot_start;
            let width = w * (dash.sweet_spot_end - dash.sweet_spot_start);
            draw_rectangle_lines(start, y - 2.0, width, 14.0, 2.0, GOLD);
        }
        Some(StateId::DreamSlashAim) => {
            if let (Some(body), Some(aim)) = (session.player_body(), pilot.aim_point) {
                let from = body.center();
                let to = from + (aim - from).clamp_length_max(dream.max_distance);
                let (a, b) = (camera.to_screen(from), camera.to_screen(to));
                draw_line(a.x, a.y, b.x, b.y, 2.0, DREAM);
                draw_circle_lines(b.x, b.y, dream.hitbox_size * 0.5, 1.0, DREAM);
            }
            bar(VIEW_WIDTH * 0.5 - 150.0, VIEW_HEIGHT - 60.0, 300.0, 1.0 - pilot.aim_progress, DREAM);
        }
        _ => {}
    }
}
